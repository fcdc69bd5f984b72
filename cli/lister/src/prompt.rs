//! Interactive menu used when no buckets are given on the command line.
//!
//! The menu walks a fixed sequence of states: listing mode, then
//! exclusions (only when files are listed), then bucket selection. Each
//! state reads one answer and yields the next state, ending in a
//! [`MenuOutcome`].

use sl_lister::{BucketSelection, ExclusionSet, ListingConfig};
use std::io::{self, BufRead, Write};

/// What to list and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// Processing configuration
    pub config: ListingConfig,

    /// Buckets to list
    pub selection: BucketSelection,
}

/// Result of the interactive menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Run with the chosen plan
    Run(RunPlan),

    /// The user chose to exit
    Exit,

    /// An answer was not one of the offered choices
    Invalid(String),
}

enum MenuState {
    Mode,
    Exclusions,
    Buckets { config: ListingConfig },
    Done(MenuOutcome),
}

/// Menu reading answers from `input` and writing prompts to `out`.
pub struct Menu<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    /// Create a menu over the given streams.
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Walk the menu to completion.
    ///
    /// End of input at any prompt is treated as a choice to exit.
    pub fn run(mut self) -> io::Result<MenuOutcome> {
        let mut state = MenuState::Mode;
        loop {
            state = match state {
                MenuState::Mode => self.choose_mode()?,
                MenuState::Exclusions => self.choose_exclusions()?,
                MenuState::Buckets { config } => self.choose_buckets(config)?,
                MenuState::Done(outcome) => return Ok(outcome),
            };
        }
    }

    fn choose_mode(&mut self) -> io::Result<MenuState> {
        writeln!(self.out, "What should the listing contain?")?;
        writeln!(self.out, "  1) Directories only")?;
        writeln!(self.out, "  2) Directories and files")?;
        writeln!(self.out, "  3) Exit")?;

        let Some(answer) = self.ask("Choice [1-3]: ")? else {
            return Ok(MenuState::Done(MenuOutcome::Exit));
        };

        Ok(match answer.as_str() {
            "1" => MenuState::Buckets {
                config: ListingConfig::new(),
            },
            "2" => MenuState::Exclusions,
            "3" => MenuState::Done(MenuOutcome::Exit),
            other => MenuState::Done(MenuOutcome::Invalid(format!(
                "'{other}' is not a listing mode"
            ))),
        })
    }

    fn choose_exclusions(&mut self) -> io::Result<MenuState> {
        let Some(answer) = self.ask("Extensions to exclude (comma separated, blank for none): ")?
        else {
            return Ok(MenuState::Done(MenuOutcome::Exit));
        };

        Ok(MenuState::Buckets {
            config: ListingConfig::new()
                .with_include_files(true)
                .with_exclusions(ExclusionSet::parse(&answer)),
        })
    }

    fn choose_buckets(&mut self, config: ListingConfig) -> io::Result<MenuState> {
        writeln!(self.out, "Which buckets should be listed?")?;
        writeln!(self.out, "  1) All buckets")?;
        writeln!(self.out, "  2) Specific buckets")?;
        writeln!(self.out, "  3) Exit")?;

        let Some(answer) = self.ask("Choice [1-3]: ")? else {
            return Ok(MenuState::Done(MenuOutcome::Exit));
        };

        let selection = match answer.as_str() {
            "1" => BucketSelection::All,
            "2" => {
                let Some(names) = self.ask("Bucket names (space or comma separated): ")? else {
                    return Ok(MenuState::Done(MenuOutcome::Exit));
                };
                let names = parse_bucket_names(&names);
                if names.is_empty() {
                    return Ok(MenuState::Done(MenuOutcome::Invalid(
                        "no bucket names given".to_string(),
                    )));
                }
                BucketSelection::Explicit(names)
            }
            "3" => return Ok(MenuState::Done(MenuOutcome::Exit)),
            other => {
                return Ok(MenuState::Done(MenuOutcome::Invalid(format!(
                    "'{other}' is not a bucket choice"
                ))));
            }
        };

        Ok(MenuState::Done(MenuOutcome::Run(RunPlan { config, selection })))
    }

    /// Print a prompt and read one trimmed answer; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Split a list of bucket names on commas and whitespace.
pub fn parse_bucket_names(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_menu(input: &str) -> MenuOutcome {
        let mut out = Vec::new();
        Menu::new(Cursor::new(input.as_bytes()), &mut out)
            .run()
            .unwrap()
    }

    #[test]
    fn test_directories_of_all_buckets() {
        assert_eq!(
            run_menu("1\n1\n"),
            MenuOutcome::Run(RunPlan {
                config: ListingConfig::new(),
                selection: BucketSelection::All,
            })
        );
    }

    #[test]
    fn test_files_with_exclusions_of_named_buckets() {
        let outcome = run_menu("2\ntmp, log\n2\nphotos, docs  archive\n");

        let MenuOutcome::Run(plan) = outcome else {
            panic!("expected a run plan, got {outcome:?}");
        };
        assert!(plan.config.include_files);
        assert_eq!(plan.config.exclusions, ExclusionSet::parse("tmp,log"));
        assert_eq!(
            plan.selection,
            BucketSelection::Explicit(vec![
                "photos".to_string(),
                "docs".to_string(),
                "archive".to_string(),
            ])
        );
    }

    #[test]
    fn test_blank_exclusions() {
        let MenuOutcome::Run(plan) = run_menu("2\n\n1\n") else {
            panic!("expected a run plan");
        };
        assert!(plan.config.include_files);
        assert!(plan.config.exclusions.is_empty());
    }

    #[test]
    fn test_exit_choices() {
        assert_eq!(run_menu("3\n"), MenuOutcome::Exit);
        assert_eq!(run_menu("1\n3\n"), MenuOutcome::Exit);
        assert_eq!(run_menu("2\ntmp\n3\n"), MenuOutcome::Exit);
    }

    #[test]
    fn test_end_of_input_exits() {
        assert_eq!(run_menu(""), MenuOutcome::Exit);
        assert_eq!(run_menu("1\n"), MenuOutcome::Exit);
        assert_eq!(run_menu("1\n2\n"), MenuOutcome::Exit);
    }

    #[test]
    fn test_invalid_choices() {
        assert!(matches!(run_menu("7\n"), MenuOutcome::Invalid(_)));
        assert!(matches!(run_menu("1\nall\n"), MenuOutcome::Invalid(_)));
        assert!(matches!(
            run_menu("1\n2\n  ,  \n"),
            MenuOutcome::Invalid(reason) if reason == "no bucket names given"
        ));
    }

    #[test]
    fn test_prompts_are_written() {
        let mut out = Vec::new();
        Menu::new(Cursor::new(b"3\n".as_slice()), &mut out)
            .run()
            .unwrap();

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("1) Directories only"));
        assert!(shown.ends_with("Choice [1-3]: "));
    }

    #[test]
    fn test_parse_bucket_names() {
        assert_eq!(parse_bucket_names("a,b  c\t,d"), vec!["a", "b", "c", "d"]);
        assert!(parse_bucket_names("  ").is_empty());
    }
}
