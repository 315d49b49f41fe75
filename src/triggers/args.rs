use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerArgs {
    pub keyword: String,
    pub delay_seconds: u32,
    pub reply_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetArgsError {
    #[error("expected a keyword, a delay and a message")]
    MissingArguments,
    #[error("delay must be a whole number of seconds, got {0:?}")]
    InvalidDelay(String),
}

/// Parses `<keyword> <delaySeconds> <message...>`.
pub fn parse_set_args(args: &str) -> Result<TriggerArgs, SetArgsError> {
    let mut tokens = args.split_whitespace();
    let (Some(keyword), Some(delay)) = (tokens.next(), tokens.next()) else {
        return Err(SetArgsError::MissingArguments);
    };
    let reply_text = tokens.collect::<Vec<_>>().join(" ");
    if reply_text.is_empty() {
        return Err(SetArgsError::MissingArguments);
    }
    let delay_seconds = delay
        .parse()
        .map_err(|_| SetArgsError::InvalidDelay(delay.to_string()))?;

    Ok(TriggerArgs {
        keyword: keyword.to_lowercase(),
        delay_seconds,
        reply_text,
    })
}
