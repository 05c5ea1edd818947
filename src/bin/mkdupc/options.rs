use dupc::args::{
    parse_hex,
    ArgError,
    ModuleIdent,
};
use message::{
    header::{
        CommandType,
        ModuleInfo,
    },
    AckType,
    BuildOptions,
    CommandSet,
    DeviceType,
    Direction,
    EncryptType,
    Fields,
};

#[derive(Debug, Clone, PartialEq, Eq, structopt::StructOpt)]
#[structopt(about = "build a DUPC packet and print it as hex")]
pub struct Options {
    #[structopt(short = "n", long = "seq_num", default_value = "0")]
    pub seq_num: u16,

    #[structopt(short = "u", long = "pack_type", default_value = "Request")]
    pub pack_type: Direction,

    #[structopt(short = "a", long = "ack_type", default_value = "NO_ACK_NEEDED")]
    pub ack_type: AckType,

    #[structopt(short = "e", long = "encrypt_type", default_value = "NO_ENC")]
    pub encrypt_type: EncryptType,

    #[structopt(short = "s", long = "cmd_set", default_value = "GENERAL")]
    pub cmd_set: CommandSet,

    #[structopt(short = "i", long = "cmd_id", default_value = "0")]
    pub cmd_id: u8,

    #[structopt(
        short = "t",
        long = "sender",
        conflicts_with_all = &["sender-type", "sender-index"],
        help = "sender type and index, in TTII form"
    )]
    pub sender: Option<ModuleIdent>,

    #[structopt(long = "sender_type", default_value = "PC")]
    pub sender_type: DeviceType,

    #[structopt(long = "sender_index", default_value = "0")]
    pub sender_index: u8,

    #[structopt(
        short = "r",
        long = "receiver",
        conflicts_with_all = &["receiver-type", "receiver-index"],
        help = "receiver type and index, in TTII form (e.g. 0300)"
    )]
    pub receiver: Option<ModuleIdent>,

    #[structopt(long = "receiver_type", default_value = "ANY")]
    pub receiver_type: DeviceType,

    #[structopt(long = "receiver_index", default_value = "0")]
    pub receiver_index: u8,

    #[structopt(
        short = "x",
        long = "payload_hex",
        conflicts_with = "payload-bin",
        help = "payload as hex, whitespace ignored"
    )]
    pub payload_hex: Option<String>,

    #[structopt(short = "p", long = "payload_bin", help = "payload as text")]
    pub payload_bin: Option<String>,

    #[structopt(long, help = "reject values that don't fit their field instead of truncating")]
    pub strict: bool,

    #[structopt(long = "protocol_version", default_value = "1")]
    pub protocol_version: u8,

    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,

    #[structopt(long, help = "multi-line log output")]
    pub pretty: bool,
}

impl Options {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            protocol_version: self.protocol_version,
            strict:           self.strict,
        }
    }

    pub fn fields(&self) -> Fields {
        let sender = match self.sender {
            Some(ModuleIdent(info)) => info,
            None => ModuleInfo::new(self.sender_type, self.sender_index),
        };

        let receiver = match self.receiver {
            Some(ModuleIdent(info)) => info,
            None => ModuleInfo::new(self.receiver_type, self.receiver_index),
        };

        Fields {
            sender,
            receiver,
            seq: self.seq_num,
            ty: CommandType {
                direction: self.pack_type,
                ack: self.ack_type,
                encrypt: self.encrypt_type,
                reserved: 0,
            },
            cmd_set: self.cmd_set,
            cmd_id: self.cmd_id,
        }
    }

    pub fn payload(&self) -> Result<Vec<u8>, ArgError> {
        match (&self.payload_hex, &self.payload_bin) {
            (Some(hex), _) => parse_hex(hex),
            (None, Some(text)) => Ok(text.as_bytes().to_vec()),
            (None, None) => Ok(vec![]),
        }
    }
}
