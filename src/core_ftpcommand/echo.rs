use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ServerContext;
use crate::core_ftpcommand::utils::resolve_path;
use crate::session::Session;
use log::{error, info};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

#[derive(Debug, PartialEq, Eq)]
enum Redirect<'a> {
    Truncate(&'a str),
    Append(&'a str),
}

/// Handles the ECHO command.
///
/// `ECHO text` replies with the text. `ECHO text > file` writes it to the
/// file, replacing its content; `>>` appends instead. One pair of
/// surrounding double quotes is stripped from the text.
pub async fn handle_echo_command(
    session: &mut Session,
    ctx: &ServerContext,
    args: Vec<String>,
) -> Result<String, FtpError> {
    if args.is_empty() {
        return Err(FtpError::syntax(FtpCommand::Echo, "missing arguments"));
    }

    let (words, redirect) = split_redirect(&args)?;
    let text = strip_quotes(&words.join(" ")).to_string();

    let Some(redirect) = redirect else {
        return Ok(format!("200 {}\r\n", text));
    };

    let (target, append) = match redirect {
        Redirect::Truncate(target) => (target, false),
        Redirect::Append(target) => (target, true),
    };
    let file_path = resolve_path(session, ctx, target)?;

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(&file_path)
        .await
        .map_err(|e| {
            error!("Failed to open {:?} for writing: {}", file_path, e);
            FtpError::io(FtpCommand::Echo, target, e)
        })?;
    file.write_all(text.as_bytes())
        .await
        .map_err(|e| FtpError::io(FtpCommand::Echo, target, e))?;
    file.flush()
        .await
        .map_err(|e| FtpError::io(FtpCommand::Echo, target, e))?;

    info!("Wrote {} bytes to {:?}", text.len(), file_path);
    Ok(format!("250 Echoed to \"{}\".\r\n", target))
}

/// Splits the words before a `>`/`>>` from the redirect target. The
/// operator may be its own word or glued to the file name.
fn split_redirect(args: &[String]) -> Result<(&[String], Option<Redirect<'_>>), FtpError> {
    let Some(pos) = args.iter().position(|a| a.starts_with('>')) else {
        return Ok((args, None));
    };

    let operator = args[pos].as_str();
    let (append, glued) = match operator.strip_prefix(">>") {
        Some(rest) => (true, rest),
        None => (false, &operator[1..]),
    };
    let target = if glued.is_empty() {
        args.get(pos + 1).map(String::as_str)
    } else {
        Some(glued)
    };

    match target {
        Some(target) if !target.is_empty() => {
            let redirect = if append {
                Redirect::Append(target)
            } else {
                Redirect::Truncate(target)
            };
            Ok((&args[..pos], Some(redirect)))
        }
        _ => Err(FtpError::syntax(FtpCommand::Echo, "missing file after redirect")),
    }
}

fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_ftpcommand::testing::{admin_dispatcher, TestServer};

    fn words(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_split_redirect() {
        let args = words("a b > out.txt");
        let (text, redirect) = split_redirect(&args).unwrap();
        assert_eq!(text, &args[..2]);
        assert_eq!(redirect, Some(Redirect::Truncate("out.txt")));

        let args = words("a >>log");
        assert_eq!(
            split_redirect(&args).unwrap().1,
            Some(Redirect::Append("log"))
        );

        let args = words("a >");
        assert!(split_redirect(&args).is_err());
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"hello file\""), "hello file");
        assert_eq!(strip_quotes("\"unbalanced"), "\"unbalanced");
        assert_eq!(strip_quotes("plain"), "plain");
    }

    #[tokio::test]
    async fn test_echo_to_client() {
        let server = TestServer::new();
        let mut dispatcher = admin_dispatcher(&server).await;
        assert_eq!(
            dispatcher.dispatch("ECHO hello world").await,
            "200 hello world\r\n"
        );
        assert_eq!(
            dispatcher.dispatch("ECHO").await,
            "501 ECHO: missing arguments.\r\n"
        );
    }

    #[tokio::test]
    async fn test_echo_truncate_then_append() {
        let server = TestServer::new();
        server.write("echo.txt", b"previous content");
        let mut dispatcher = admin_dispatcher(&server).await;

        assert_eq!(
            dispatcher.dispatch("ECHO \"hello file\" > echo.txt").await,
            "250 Echoed to \"echo.txt\".\r\n"
        );
        assert_eq!(std::fs::read_to_string(server.path("echo.txt")).unwrap(), "hello file");

        dispatcher.dispatch("ECHO , again >> echo.txt").await;
        assert_eq!(
            std::fs::read_to_string(server.path("echo.txt")).unwrap(),
            "hello file, again"
        );
    }

    #[tokio::test]
    async fn test_echo_redirect_stays_in_sandbox() {
        let server = TestServer::new();
        let mut dispatcher = admin_dispatcher(&server).await;
        assert_eq!(
            dispatcher.dispatch("ECHO x > ../../tmp/owned").await,
            "550 Access denied.\r\n"
        );
    }
}
