use tmlisten_command::parse_incoming;

use crate::cmd::{unescape, DecodeArgs};
use crate::exit::{decode_error, CliResult, SUCCESS};
use crate::output::{print_response, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = with_terminator(unescape(&args.frame));
    let response =
        parse_incoming(wire.as_bytes()).map_err(|err| decode_error("decode failed", err))?;
    print_response(&response, format);
    Ok(SUCCESS)
}

fn with_terminator(mut wire: String) -> String {
    if !wire.ends_with("\r\n") {
        wire.push_str("\r\n");
    }
    wire
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminator_added_once() {
        assert_eq!(with_terminator("$CPERR,2,00,*48".into()), "$CPERR,2,00,*48\r\n");
        assert_eq!(
            with_terminator("$CPERR,2,00,*48\r\n".into()),
            "$CPERR,2,00,*48\r\n"
        );
    }
}
