// Ordered command list that forms a complete scan document
use super::command::Command;
use crate::error::MalformedResponse;
use crate::infrastructure::xml::{Element, XmlBuilder};

const ROOT_TAG: &str = "commands";

/// Commands in execution order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandSequence {
    commands: Vec<Command>,
}

impl CommandSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, command: impl Into<Command>) -> Self {
        self.commands.push(command.into());
        self
    }

    pub fn push(&mut self, command: impl Into<Command>) {
        self.commands.push(command.into());
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The `<commands>` document submitted to the server.
    pub fn render(&self) -> String {
        let mut xml = XmlBuilder::new();
        if self.commands.is_empty() {
            xml.empty(ROOT_TAG);
        } else {
            xml.open(ROOT_TAG);
            for command in &self.commands {
                command.write_xml(&mut xml);
            }
            xml.close(ROOT_TAG);
        }
        xml.finish()
    }

    /// One descriptor per line.
    pub fn describe(&self) -> String {
        self.commands
            .iter()
            .map(Command::describe)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse a `<commands>` document, such as the one returned for a submitted scan.
    pub fn parse(xml: &str) -> Result<Self, MalformedResponse> {
        let root = Element::parse(xml)?.expect_root("CommandSequence", ROOT_TAG)?;
        let commands = root
            .children
            .iter()
            .map(Command::from_element)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("Parsed {} commands", commands.len());
        Ok(Self { commands })
    }
}

impl<C: Into<Command>> FromIterator<C> for CommandSequence {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<C: Into<Command>> Extend<C> for CommandSequence {
    fn extend<I: IntoIterator<Item = C>>(&mut self, iter: I) {
        self.commands.extend(iter.into_iter().map(Into::into));
    }
}

impl<'a> IntoIterator for &'a CommandSequence {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// What gets shipped to `submit` or `simulate`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanSource {
    /// A ready-made `<commands>` document, e.g. the contents of a `.scn` file.
    Xml(String),
    Commands(CommandSequence),
}

impl ScanSource {
    pub fn to_xml(&self) -> String {
        match self {
            ScanSource::Xml(xml) => xml.clone(),
            ScanSource::Commands(sequence) => sequence.render(),
        }
    }
}

impl From<CommandSequence> for ScanSource {
    fn from(sequence: CommandSequence) -> Self {
        ScanSource::Commands(sequence)
    }
}

impl From<String> for ScanSource {
    fn from(xml: String) -> Self {
        ScanSource::Xml(xml)
    }
}

impl From<&str> for ScanSource {
    fn from(xml: &str) -> Self {
        ScanSource::Xml(xml.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::command::{Comment, Delay, Generic, Include, Log, Loop, Script, Set, Wait};

    fn sample_sequence() -> CommandSequence {
        CommandSequence::new()
            .with(Comment::new("haha"))
            .with(Comment::new("hehe"))
            .with(Generic::new(true))
            .with(Delay::new(2.0).unwrap())
            .with(Include::new("1.scn").unwrap().with_macros("macro=value"))
            .with(Log::new(["shutter", "xpos", "ypos"]).unwrap())
            .with(
                Loop::builder("xpos", 0.0, 10.0, 1.0)
                    .completion(true)
                    .body([Command::from(Comment::new("haha")), Generic::new(true).into()])
                    .build()
                    .unwrap(),
            )
            .with(Script::new("submit.py", ["1", "abc", "0.05"]).unwrap())
            .with(
                Set::builder("shutter", 0.1)
                    .completion(true)
                    .wait(false)
                    .timeout(0.1)
                    .build()
                    .unwrap(),
            )
            .with(
                Wait::builder("shutter", 10.0)
                    .tolerance(0.1)
                    .timeout(5.0)
                    .build()
                    .unwrap(),
            )
    }

    #[test]
    fn test_empty_sequence() {
        let sequence = CommandSequence::new();
        assert_eq!(sequence.render(), "<commands/>");
        assert_eq!(sequence.describe(), "");
        assert!(CommandSequence::parse("<commands/>").unwrap().is_empty());
    }

    #[test]
    fn test_render_preserves_order() {
        let sequence: CommandSequence = vec![
            Command::from(Delay::new(1.0).unwrap()),
            Comment::new("after delay").into(),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            sequence.render(),
            "<commands><delay><seconds>1.0</seconds></delay>\
             <comment><text>after delay</text></comment></commands>"
        );
        assert_eq!(
            sequence.describe(),
            "DelayCommand(seconds=1.0)\nCommentCommand('after delay')"
        );
    }

    #[test]
    fn test_round_trip() {
        let sequence = sample_sequence();
        let xml = sequence.render();
        let parsed = CommandSequence::parse(&xml).unwrap();
        assert_eq!(parsed, sequence);
        assert_eq!(parsed.render(), xml);
    }

    #[test]
    fn test_parse_rejects_wrong_root() {
        let err = CommandSequence::parse("<scan/>").unwrap_err();
        match err {
            MalformedResponse::UnexpectedRoot { expected, actual, .. } => {
                assert_eq!(expected, "commands");
                assert_eq!(actual, "scan");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_server_listing() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
            <commands>
                <comment>
                    <address>0</address>
                    <text>Successfully adding a new scan!</text>
                </comment>
                <delay>
                    <address>1</address>
                    <seconds>5.0</seconds>
                </delay>
            </commands>"#;
        let parsed = CommandSequence::parse(xml).unwrap();
        assert_eq!(parsed.len(), 2);
        match &parsed.commands()[0] {
            Command::Comment(comment) => {
                assert_eq!(comment.address(), Some(0));
                assert_eq!(comment.text(), "Successfully adding a new scan!");
            }
            other => panic!("unexpected command: {other}"),
        }
        assert_eq!(parsed.commands()[1], Command::from(Delay::new(5.0).unwrap()));
    }

    #[test]
    fn test_parse_demo_scan_file() {
        let parsed = CommandSequence::parse(include_str!("../../demos/example.scn")).unwrap();
        let tags: Vec<&str> = parsed.iter().map(Command::tag).collect();
        assert_eq!(tags, vec!["comment", "set", "loop", "set"]);
        match &parsed.commands()[2] {
            Command::Loop(lp) => {
                assert_eq!(lp.device(), "xpos");
                assert_eq!(lp.body().len(), 2);
            }
            other => panic!("unexpected command: {other}"),
        }
    }

    #[test]
    fn test_scan_source_xml() {
        assert_eq!(ScanSource::from("<commands/>").to_xml(), "<commands/>");
        let source = ScanSource::from(CommandSequence::new().with(Delay::new(1.0).unwrap()));
        assert_eq!(source.to_xml(), "<commands><delay><seconds>1.0</seconds></delay></commands>");
    }
}
