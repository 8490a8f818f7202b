use std::io::{self, BufRead, Write};

/// Terminal used by the interactive flows. Each `prompt` reads exactly one
/// line; the input stream is not held between prompts.
pub trait Console {
    fn prompt(&mut self, question: &str) -> io::Result<String>;
    fn say(&mut self, line: &str);
}

#[derive(Debug, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for TerminalConsole {
    fn prompt(&mut self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "terminal input closed"));
        }

        Ok(strip_line_ending(&line).to_string())
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Console fed from a fixed list of answers that records everything shown.
    #[derive(Debug, Default)]
    pub struct ScriptedConsole {
        answers: VecDeque<String>,
        pub prompts: Vec<String>,
        pub lines: Vec<String>,
    }

    impl ScriptedConsole {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn printed(&self, needle: &str) -> bool {
            self.lines.iter().any(|line| line.contains(needle))
        }
    }

    impl Console for ScriptedConsole {
        fn prompt(&mut self, question: &str) -> io::Result<String> {
            self.prompts.push(question.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }

        fn say(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedConsole;
    use super::*;

    #[test]
    fn strips_unix_line_ending() {
        assert_eq!(strip_line_ending("1\n"), "1");
    }

    #[test]
    fn strips_windows_line_ending() {
        assert_eq!(strip_line_ending("09:30\r\n"), "09:30");
    }

    #[test]
    fn keeps_surrounding_spaces() {
        assert_eq!(strip_line_ending(" 1 \n"), " 1 ");
    }

    #[test]
    fn scripted_console_answers_in_order() {
        let mut console = ScriptedConsole::new(&["first", "second"]);

        assert_eq!(console.prompt("a? ").unwrap(), "first");
        assert_eq!(console.prompt("b? ").unwrap(), "second");
        assert!(console.prompt("c? ").is_err());
        assert_eq!(console.prompts, vec!["a? ", "b? ", "c? "]);
    }
}
