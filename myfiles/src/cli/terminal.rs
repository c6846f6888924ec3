//! Terminal side of the browser: notifications go to the console, share
//! intents and copied links are printed and downloads land in a directory.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use client::surface::{Desktop, Navigator, Notifier};
use kernel::Route;

pub struct TerminalSurface {
    out_dir: PathBuf,
}

impl TerminalSurface {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

impl Notifier for TerminalSurface {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

impl Navigator for TerminalSurface {
    fn redirect(&self, route: Route) {
        eprintln!(
            "Please {route}: set {} to your access token",
            client::config::ACCESS_TOKEN_VAR
        );
    }
}

#[async_trait]
impl Desktop for TerminalSurface {
    fn open_url(&self, url: &str) -> client::Result<()> {
        println!("Open this link to share: {url}");
        Ok(())
    }

    fn copy_text(&self, text: &str) -> client::Result<()> {
        println!("{text}");
        Ok(())
    }

    async fn save_file(&self, file_name: &str, data: &[u8]) -> client::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.out_dir).await?;
        let path = self.out_dir.join(file_name);
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }
}

/// Asks a yes/no question on the terminal. Anything but `y` or `yes` is a no.
pub fn confirm(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    read_answer(io::stdin().lock())
}

fn read_answer<R: BufRead>(mut input: R) -> bool {
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("y\n", true)]
    #[case("Yes\n", true)]
    #[case(" y ", true)]
    #[case("\n", false)]
    #[case("n\n", false)]
    #[case("", false)]
    #[case("yep\n", false)]
    #[trace]
    fn read_answer_tests(#[case] input: &str, #[case] expected: bool) {
        // Act
        let answer = read_answer(input.as_bytes());

        // Assert
        assert_eq!(answer, expected);
    }

    #[tokio::test]
    async fn save_file_creates_out_dir() {
        // Arrange
        let dir = std::env::temp_dir()
            .join(format!("myfiles-{}", std::process::id()))
            .join("nested");
        let surface = TerminalSurface::new(&dir);

        // Act
        let path = surface.save_file("a.txt", b"hello").await.unwrap();

        // Assert
        assert_eq!(path, dir.join("a.txt"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"hello");
        tokio::fs::remove_dir_all(dir.parent().unwrap()).await.unwrap();
    }
}
