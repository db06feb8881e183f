use crate::cmd::{build_message, FrameArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: FrameArgs, format: OutputFormat) -> CliResult<i32> {
    let frame = build_message(&args.message)?;
    print_frame(&frame, format);
    Ok(SUCCESS)
}
