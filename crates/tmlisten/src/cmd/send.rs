use std::net::{IpAddr, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tmlisten_command::Response;
use tmlisten_frame::{FrameConfig, FrameReader, FrameWriter, DEFAULT_PORT};

use crate::cmd::{build_message, SendArgs};
use crate::exit::{decode_error, frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_response, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let frame = build_message(&args.message)?;
    let addr = resolve_addr(&args.addr)?;

    let stream =
        TcpStream::connect_timeout(&addr, timeout).map_err(|err| io_error("connect failed", err))?;
    let read_half = stream
        .try_clone()
        .map_err(|err| io_error("connect failed", err))?;
    let config = FrameConfig {
        read_timeout: Some(timeout),
        write_timeout: Some(timeout),
        ..FrameConfig::default()
    };
    let mut writer = FrameWriter::with_config_tcp(stream, config.clone())
        .map_err(|err| frame_error("connect failed", err))?;
    let mut reader = FrameReader::with_config_tcp(read_half, config)
        .map_err(|err| frame_error("connect failed", err))?;

    tracing::info!(%addr, header = %frame.header(), length = frame.length(), "sending message");
    writer
        .write_frame(&frame)
        .map_err(|err| frame_error("send failed", err))?;

    let reply = reader
        .read_frame()
        .map_err(|err| frame_error("receive failed", err))?;
    let response = Response::from_frame(&reply).map_err(|err| decode_error("receive failed", err))?;
    print_response(&response, format);

    Ok(SUCCESS)
}

fn resolve_addr(input: &str) -> CliResult<SocketAddr> {
    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }
    let target = if input.contains(':') {
        input.to_string()
    } else {
        format!("{input}:{DEFAULT_PORT}")
    };
    target
        .to_socket_addrs()
        .map_err(|err| CliError::new(USAGE, format!("invalid address {input}: {err}")))?
        .next()
        .ok_or_else(|| CliError::new(USAGE, format!("address {input} did not resolve")))
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = match input.strip_suffix("ms") {
        Some(number) => (number, true),
        None => (input.strip_suffix('s').unwrap_or(input), false),
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_durations() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration(" 2 ").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("0ms").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("fast").unwrap_err().code, USAGE);
    }

    #[test]
    fn default_port_applied() {
        assert_eq!(
            resolve_addr("127.0.0.1").unwrap(),
            SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
        );
        assert_eq!(
            resolve_addr("127.0.0.1:6000").unwrap(),
            SocketAddr::from(([127, 0, 0, 1], 6000))
        );
        assert_eq!(resolve_addr("::1").unwrap().port(), DEFAULT_PORT);
    }
}
