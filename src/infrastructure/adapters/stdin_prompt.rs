//! 사용자 입력 프롬프트 포트 구현 어댑터.

use std::io::{self, BufRead, Write};

use crate::application::ports::InteractivePrompt;
use crate::domain::error::{ConfigError, ConfigResult};

/// stderr로 문구를 출력하고 stdin에서 한 줄을 읽는 어댑터.
pub struct StdinPrompt;

impl InteractivePrompt for StdinPrompt {
    fn prompt(&self, text: &str) -> ConfigResult<String> {
        eprint!("{text}");
        io::stderr()
            .flush()
            .map_err(|e| ConfigError::Prompt(e.to_string()))?;

        read_answer(&mut io::stdin().lock())
    }
}

/// 줄바꿈만 제거한다. 입력이 끝났으면(EOF) 오류.
fn read_answer(input: &mut impl BufRead) -> ConfigResult<String> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| ConfigError::Prompt(e.to_string()))?;
    if read == 0 {
        return Err(ConfigError::Prompt("stdin closed before an answer was given".to_string()));
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn strips_line_ending_only() {
        let mut input = Cursor::new(" primary \r\nrest");
        assert_eq!(read_answer(&mut input).unwrap(), " primary ");
    }

    #[test]
    fn eof_is_an_error() {
        let mut input = Cursor::new("");
        assert!(matches!(read_answer(&mut input), Err(ConfigError::Prompt(_))));
    }
}
