#![allow(dead_code)]

use tracing_subscriber::{
    fmt::format::FmtSpan,
    EnvFilter,
};

use dupc::message::{
    header::{
        CommandType,
        ModuleInfo,
    },
    AckType,
    CommandSet,
    DeviceType,
    Fields,
};

pub const KNOWN_PACKET: &str = "55 0d 04 33 0a 0e 03 00 40 00 01 24 1e";

pub fn trace_init() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::new("debug"))
        .pretty()
        .try_init();
}

/// PC to OFDM_GROUND, seq 3, ack after exec, GENERAL/0x01.
pub fn known_fields() -> Fields {
    Fields {
        sender: ModuleInfo::new(DeviceType::PC, 0),
        receiver: ModuleInfo::new(DeviceType::OFDM_GROUND, 0),
        seq: 3,
        ty: CommandType {
            ack: AckType::ACK_AFTER_EXEC,
            ..Default::default()
        },
        cmd_set: CommandSet::GENERAL,
        cmd_id: 0x01,
    }
}
