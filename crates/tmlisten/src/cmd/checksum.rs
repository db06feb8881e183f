use tmlisten_frame::checksum;

use crate::cmd::{unescape, ChecksumArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_checksum, OutputFormat};

pub fn run(args: ChecksumArgs, format: OutputFormat) -> CliResult<i32> {
    let text = unescape(&args.text);
    print_checksum(&text, checksum(text.as_bytes()), format);
    Ok(SUCCESS)
}
