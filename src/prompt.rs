//! Interactive prompts for settings the command line left out.

use std::path::PathBuf;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::config::{JobSettings, Mode};
use crate::error::{Geo2SqlError, Geo2SqlResult};

/// Something that can ask the user a question.
pub trait Prompter {
    /// Ask `question` and return the trimmed answer.
    fn ask(&mut self, question: &str) -> Geo2SqlResult<String>;
}

/// Line-editor prompter with history in `~/.geo2sql_history`.
pub struct LinePrompter {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl LinePrompter {
    pub fn new() -> Geo2SqlResult<Self> {
        let mut editor = DefaultEditor::new()
            .map_err(|e| Geo2SqlError::Config(format!("failed to start prompt: {}", e)))?;
        let history = dirs::home_dir().map(|p| p.join(".geo2sql_history"));
        if let Some(path) = &history {
            let _ = editor.load_history(path);
        }
        Ok(Self { editor, history })
    }
}

impl Prompter for LinePrompter {
    fn ask(&mut self, question: &str) -> Geo2SqlResult<String> {
        match self.editor.readline(question) {
            Ok(line) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(line)
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                Err(Geo2SqlError::Config("input cancelled".into()))
            }
            Err(e) => Err(Geo2SqlError::Config(format!("prompt failed: {}", e))),
        }
    }
}

impl Drop for LinePrompter {
    fn drop(&mut self) {
        if let Some(path) = &self.history {
            let _ = self.editor.save_history(path);
        }
    }
}

fn input_question(mode: Mode) -> &'static str {
    match mode {
        Mode::Route | Mode::Segments => "Enter the path to your GeoJSON file: ",
        Mode::Poles => "Enter the path to your Point GeoJSON file: ",
    }
}

fn name_question(mode: Mode) -> &'static str {
    match mode {
        Mode::Route => "Enter the name for this cable route: ",
        Mode::Segments => "Enter the base name for the route segments: ",
        Mode::Poles => "Enter the EXACT name of the route these poles belong to: ",
    }
}

fn required(answer: String, what: &str) -> Geo2SqlResult<String> {
    if answer.is_empty() {
        Err(Geo2SqlError::Config(format!("no {} given", what)))
    } else {
        Ok(answer)
    }
}

/// Ask for the input path and route name if `settings` lacks them.
/// The mode must already be known.
pub fn fill_missing(settings: &mut JobSettings, prompter: &mut impl Prompter) -> Geo2SqlResult<()> {
    let mode = settings
        .mode
        .ok_or_else(|| Geo2SqlError::Config("no mode given (route, segments or poles)".into()))?;

    if settings.input.is_none() {
        let answer = prompter.ask(input_question(mode))?;
        settings.input = Some(PathBuf::from(required(answer, "input file")?));
    }
    if settings.route_name.as_deref().is_none_or(str::is_empty) {
        let answer = prompter.ask(name_question(mode))?;
        settings.route_name = Some(required(answer, "route name")?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    struct Scripted {
        answers: VecDeque<&'static str>,
        asked: Vec<String>,
    }

    impl Scripted {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompter for Scripted {
        fn ask(&mut self, question: &str) -> Geo2SqlResult<String> {
            self.asked.push(question.to_string());
            self.answers
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| Geo2SqlError::Config("input cancelled".into()))
        }
    }

    #[test]
    fn test_prompts_for_missing_fields() {
        let mut settings = JobSettings {
            mode: Some(Mode::Poles),
            ..Default::default()
        };
        let mut prompter = Scripted::new(&["poles.geojson", "BNZ-GKP (no.2)"]);
        fill_missing(&mut settings, &mut prompter).unwrap();

        assert_eq!(settings.input, Some(PathBuf::from("poles.geojson")));
        assert_eq!(settings.route_name.as_deref(), Some("BNZ-GKP (no.2)"));
        assert_eq!(
            prompter.asked,
            vec![
                "Enter the path to your Point GeoJSON file: ",
                "Enter the EXACT name of the route these poles belong to: ",
            ]
        );
    }

    #[test]
    fn test_does_not_ask_for_known_fields() {
        let mut settings = JobSettings {
            mode: Some(Mode::Route),
            input: Some("a.geojson".into()),
            route_name: Some("R1".into()),
            ..Default::default()
        };
        let mut prompter = Scripted::new(&[]);
        fill_missing(&mut settings, &mut prompter).unwrap();
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn test_route_prompts_use_plain_wording() {
        let mut settings = JobSettings {
            mode: Some(Mode::Segments),
            ..Default::default()
        };
        let mut prompter = Scripted::new(&["cables.geojson", "BNZ"]);
        fill_missing(&mut settings, &mut prompter).unwrap();
        assert_eq!(
            prompter.asked,
            vec![
                "Enter the path to your GeoJSON file: ",
                "Enter the base name for the route segments: ",
            ]
        );
    }

    #[test]
    fn test_empty_answer_is_an_error() {
        let mut settings = JobSettings {
            mode: Some(Mode::Route),
            ..Default::default()
        };
        let mut prompter = Scripted::new(&[""]);
        assert!(fill_missing(&mut settings, &mut prompter).is_err());
        assert_eq!(
            prompter.asked,
            vec!["Enter the path to your GeoJSON file: "]
        );
    }
}
