use std::io::Write;

use anyhow::{anyhow, Result};
use tokio::io::{stdin, AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

type Input = Box<dyn AsyncBufRead + Unpin + Send>;

/// Line-based questions, read from stdin unless another reader is given.
pub struct Prompt {
    lines: Lines<Input>,
}

impl Prompt {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(stdin()))
    }

    pub fn from_reader(reader: impl AsyncBufRead + Unpin + Send + 'static) -> Self {
        let input: Input = Box::new(reader);
        Self {
            lines: input.lines(),
        }
    }

    pub async fn ask(&mut self, label: &str) -> Result<String> {
        print!("{}: ", label);
        std::io::stdout().flush()?;

        let line = self.lines
            .next_line()
            .await?
            .ok_or_else(|| anyhow!("input closed"))?;
        Ok(line.trim().to_string())
    }

    /// Like [`Prompt::ask`], falling back to `default` on an empty answer.
    pub async fn ask_or(&mut self, label: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            return self.ask(label).await;
        }

        let answer = self.ask(&format!("{} [{}]", label, default)).await?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }
}
