use eyre::Result;
use structopt::StructOpt as _;

use dupc::{
    args::format_hex,
    trace,
};

pub use crate::options::Options;

mod options;

fn main() -> Result<()> {
    let options = Options::from_args();
    trace::init(options.pretty, options.verbose);

    let fields = options.fields();
    let payload = options.payload()?;

    tracing::debug!(header = ?fields, payload.len = payload.len(), "building packet");

    let packet = message::build(&options.build_options(), &fields, &payload)?;
    println!("{}", format_hex(&packet));

    Ok(())
}
