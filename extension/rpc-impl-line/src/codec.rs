use fanout::rpc::RpcServiceError;
use fanout::transport::{Transport, TransportError};
use fanout::Invocation;
use thiserror::Error;

/// Default limit of a single request or response line, 1MiB.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

const SEPARATOR: char = '\t';
const KWARG_SEPARATOR: char = '=';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty line")]
    Empty,

    #[error("missing method name")]
    MissingMethod,

    #[error("invalid escape sequence \\{0}")]
    BadEscape(char),

    #[error("unexpected '=' in token {0}")]
    BadToken(String),

    #[error("unknown status {0:?}")]
    BadStatus(char),

    #[error("malformed error response: {0}")]
    BadError(String),

    #[error("line is not valid utf-8")]
    Utf8,

    #[error("line exceeds the limit of {max} bytes")]
    LineTooLong { max: usize },
}

#[derive(Debug, Error)]
pub enum LineError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// One tab separated field, `value` or `name=value`.
#[derive(Debug, PartialEq, Eq)]
struct Token {
    name: Option<String>,
    value: String,
}

fn escape(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '=' => out.push_str("\\="),
            c => out.push(c),
        }
    }
}

fn tokenize(line: &str) -> Result<Vec<Token>, DecodeError> {
    let mut tokens = Vec::new();
    let mut name: Option<String> = None;
    let mut current = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next().ok_or(DecodeError::BadEscape('\\'))?;
                current.push(match escaped {
                    '\\' => '\\',
                    't' => '\t',
                    'n' => '\n',
                    'r' => '\r',
                    '=' => '=',
                    other => return Err(DecodeError::BadEscape(other)),
                });
            }
            SEPARATOR => {
                tokens.push(Token {
                    name: name.take(),
                    value: std::mem::take(&mut current),
                });
            }
            KWARG_SEPARATOR => {
                if name.is_some() {
                    return Err(DecodeError::BadToken(line.to_string()));
                }
                name = Some(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    tokens.push(Token { name, value: current });
    Ok(tokens)
}

/// `method`, then one field per positional argument, then `name=value` per keyword
/// argument, tab separated and terminated by a newline.
pub fn encode_request(invocation: &Invocation<String>) -> String {
    let mut line = String::new();
    escape(invocation.method(), &mut line);
    for arg in invocation.args() {
        line.push(SEPARATOR);
        escape(arg, &mut line);
    }
    for (name, value) in invocation.kwargs() {
        line.push(SEPARATOR);
        escape(name, &mut line);
        line.push(KWARG_SEPARATOR);
        escape(value, &mut line);
    }
    line.push('\n');
    line
}

/// Parse a request line without its trailing newline.
pub fn decode_request(line: &str) -> Result<Invocation<String>, DecodeError> {
    if line.is_empty() {
        return Err(DecodeError::Empty);
    }
    let mut tokens = tokenize(line)?.into_iter();
    let method = match tokens.next() {
        Some(Token { name: None, value }) if !value.is_empty() => value,
        _ => return Err(DecodeError::MissingMethod),
    };
    let mut invocation = Invocation::new(method);
    for token in tokens {
        invocation = match token.name {
            Some(name) => invocation.kwarg(name, token.value),
            None => invocation.arg(token.value),
        };
    }
    Ok(invocation)
}

/// `+payload` on success, `-code<TAB>message` on failure.
pub fn encode_response(result: &Result<String, RpcServiceError>) -> String {
    let mut line = String::new();
    match result {
        Ok(payload) => {
            line.push('+');
            escape(payload, &mut line);
        }
        Err(e) => {
            line.push('-');
            line.push_str(&i32::from(e.code).to_string());
            line.push(SEPARATOR);
            escape(&e.msg, &mut line);
        }
    }
    line.push('\n');
    line
}

/// Parse a response line without its trailing newline. The outer error is a malformed
/// line, the inner one an error reported by the service.
pub fn decode_response(line: &str) -> Result<Result<String, RpcServiceError>, DecodeError> {
    let mut chars = line.chars();
    let status = chars.next().ok_or(DecodeError::Empty)?;
    let rest = chars.as_str();
    match status {
        '+' => {
            let mut tokens = tokenize(rest)?;
            match (tokens.len(), tokens.pop()) {
                (1, Some(Token { name: None, value })) => Ok(Ok(value)),
                _ => Err(DecodeError::BadToken(rest.to_string())),
            }
        }
        '-' => {
            let tokens = tokenize(rest)?;
            match &tokens[..] {
                [Token { name: None, value: code }, Token { name: None, value: msg }] => {
                    let code = code.parse::<i32>().map_err(|_| DecodeError::BadError(rest.to_string()))?;
                    Ok(Err(RpcServiceError::from_i32(code, msg.clone())))
                }
                _ => Err(DecodeError::BadError(rest.to_string())),
            }
        }
        other => Err(DecodeError::BadStatus(other)),
    }
}

/// Read up to the next newline, which is consumed and not returned.
pub async fn read_line<T>(transport: &mut T, max_line_bytes: usize) -> Result<String, LineError>
where
    T: Transport,
{
    let mut line = Vec::new();
    loop {
        let byte = transport.read_exact(1).await?;
        if byte[0] == b'\n' {
            break;
        }
        if line.len() >= max_line_bytes {
            return Err(DecodeError::LineTooLong { max: max_line_bytes }.into());
        }
        line.push(byte[0]);
    }
    let line = String::from_utf8(line).map_err(|_| DecodeError::Utf8)?;
    Ok(line)
}
