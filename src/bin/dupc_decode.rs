use std::{
    io,
    io::Read,
};

use structopt::StructOpt;

use dupc::{
    args::parse_hex,
    trace,
    trace_catch,
};

#[derive(Debug, Clone, PartialEq, Eq, structopt::StructOpt)]
#[structopt(about = "decode a DUPC packet from stdin (default hex, whitespace ignored)")]
pub struct Mode {
    #[structopt(long, help = "interpret stdin as raw binary")]
    raw: bool,

    #[structopt(long, help = "print the decoded packet as json")]
    json: bool,

    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() -> eyre::Result<()> {
    let mode = Mode::from_args();
    trace::init(false, mode.verbose);

    let buf = if mode.raw {
        let mut buf = vec![];
        io::stdin().read_to_end(&mut buf)?;

        buf
    } else {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s)?;

        parse_hex(&s)?
    };

    let pkt = message::interpret(&buf)?;

    let verified = pkt.verify_standard();
    trace_catch!(verified, "checksum verification failed");

    if mode.json {
        let mut value = serde_json::to_value(&pkt)?;
        value["checksums_valid"] = verified.is_ok().into();

        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{pkt}");

    match verified {
        Ok(()) => println!("  checksums ok"),
        Err(e) => println!("  {e}"),
    }

    Ok(())
}
