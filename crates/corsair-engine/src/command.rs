//! Command parsing and the registry of known verbs.
//!
//! A line is split on whitespace; the first word is the verb and the rest
//! are parameters. Direction words after `go` are canonicalised before the
//! parameter count is checked, so `go nord` and `go N` are the same command.

use strsim::jaro_winkler;

use crate::error::{GameError, GameResult};

/// Minimum similarity for a "did you mean" suggestion (0.0-1.0).
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Synonyms accepted after `go`, and their canonical token.
const DIRECTION_SYNONYMS: &[(&str, &str)] = &[
    ("NORD", "N"),
    ("EST", "E"),
    ("SUD", "S"),
    ("OUEST", "O"),
    ("UP", "U"),
    ("DOWN", "D"),
];

/// Every action a registered command can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// List the commands.
    Help,
    /// End the session.
    Quit,
    /// Move through an exit.
    Go,
    /// List the rooms visited so far.
    History,
    /// Return to the previous room.
    Back,
    /// Describe the current room.
    Look,
    /// Show crew and inventory.
    Check,
    /// Pick an item up.
    Take,
    /// Put an item down.
    Drop,
    /// Speak to a character.
    Talk,
    /// List every quest.
    Quests,
    /// Show one quest in detail.
    Quest,
    /// Start a quest.
    Activate,
    /// List the rewards earned.
    Rewards,
}

impl Verb {
    /// Whether this verb moves the player, which lets characters wander
    /// afterwards.
    pub fn is_movement(&self) -> bool {
        matches!(self, Self::Go | Self::Back)
    }
}

/// How many parameters a command takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many.
    Exact(usize),
    /// This many or more; the parameters are joined back into one string.
    AtLeast(usize),
}

impl Arity {
    /// Check a parameter count.
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exact(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }

    /// Whether the command takes any parameter at all.
    pub fn takes_parameter(&self) -> bool {
        !matches!(self, Self::Exact(0))
    }
}

/// A registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The word typed to invoke it.
    pub word: &'static str,
    /// Usage text shown by `help`, after the word.
    pub usage: &'static str,
    /// Expected parameters.
    pub arity: Arity,
    /// What it does.
    pub verb: Verb,
}

impl CommandSpec {
    /// Create a command.
    pub const fn new(word: &'static str, usage: &'static str, arity: Arity, verb: Verb) -> Self {
        Self {
            word,
            usage,
            arity,
            verb,
        }
    }
}

/// A parsed line that matched a registered command with the right arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The action to run.
    pub verb: Verb,
    /// Parameters after the verb, directions already canonicalised.
    pub args: Vec<String>,
}

impl Command {
    /// The first parameter, or an empty string.
    pub fn arg(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    /// Every parameter joined by single spaces, for multi-word titles.
    pub fn rest(&self) -> String {
        self.args.join(" ")
    }
}

/// The commands understood by a session, in `help` order.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    specs: Vec<CommandSpec>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self { specs: Vec::new() }
    }

    /// The full game vocabulary.
    pub fn standard() -> Self {
        use Arity::{AtLeast, Exact};
        let mut registry = Self::empty();
        for spec in [
            CommandSpec::new("help", " : afficher cette aide", Exact(0), Verb::Help),
            CommandSpec::new("quit", " : quitter le jeu", Exact(0), Verb::Quit),
            CommandSpec::new(
                "go",
                " <direction> : se déplacer (N, E, S, O, U, D)",
                Exact(1),
                Verb::Go,
            ),
            CommandSpec::new("history", " : historique des lieux visités", Exact(0), Verb::History),
            CommandSpec::new("back", " : revenir en arrière", Exact(0), Verb::Back),
            CommandSpec::new("look", " : observer la pièce", Exact(0), Verb::Look),
            CommandSpec::new("check", " : inventaire et état", Exact(0), Verb::Check),
            CommandSpec::new("take", " <item> : prendre un objet", Exact(1), Verb::Take),
            CommandSpec::new("drop", " <item> : poser un objet", Exact(1), Verb::Drop),
            CommandSpec::new("talk", " <nom> : discuter avec un personnage", Exact(1), Verb::Talk),
            CommandSpec::new("quests", " : afficher les quêtes", Exact(0), Verb::Quests),
            CommandSpec::new("quest", " <titre> : détails d'une quête", AtLeast(1), Verb::Quest),
            CommandSpec::new(
                "activate",
                " <titre> : activer une quête",
                AtLeast(1),
                Verb::Activate,
            ),
            CommandSpec::new("rewards", " : afficher les récompenses", Exact(0), Verb::Rewards),
        ] {
            registry.register(spec);
        }
        registry
    }

    /// Add a command. A later registration of the same word replaces the
    /// earlier one.
    pub fn register(&mut self, spec: CommandSpec) {
        match self.specs.iter_mut().find(|s| s.word == spec.word) {
            Some(slot) => *slot = spec,
            None => self.specs.push(spec),
        }
    }

    /// Look up a command by word.
    pub fn get(&self, word: &str) -> Option<&CommandSpec> {
        self.specs.iter().find(|s| s.word == word)
    }

    /// Registered commands in order.
    pub fn specs(&self) -> &[CommandSpec] {
        &self.specs
    }

    /// The `help` listing.
    pub fn help(&self) -> String {
        let mut out = "Voici les commandes disponibles:".to_string();
        for spec in &self.specs {
            out.push_str(&format!("\n\t- {}{}", spec.word, spec.usage));
        }
        out
    }

    /// Parse a line.
    ///
    /// Empty input yields `Ok(None)`. An unknown verb or a wrong number of
    /// parameters is an error and nothing runs.
    pub fn parse(&self, line: &str) -> GameResult<Option<Command>> {
        let words = tokenize(line);
        let Some((verb, args)) = words.split_first() else {
            return Ok(None);
        };

        let Some(spec) = self.get(verb) else {
            return Err(GameError::UnknownCommand {
                verb: verb.clone(),
                suggestion: self.suggest(verb).map(str::to_string),
            });
        };

        if !spec.arity.accepts(args.len()) {
            return Err(GameError::Arity {
                verb: verb.clone(),
                takes_parameter: spec.arity.takes_parameter(),
            });
        }

        Ok(Some(Command {
            verb: spec.verb,
            args: args.to_vec(),
        }))
    }

    /// The registered word closest to `input`, if it is close enough.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        self.specs
            .iter()
            .map(|s| (s.word, jaro_winkler(input, s.word)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(word, _)| word)
    }
}

/// Split a line into words. The verb is lower-cased; the word after `go`
/// is upper-cased and mapped through the direction synonyms.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if let Some(verb) = words.first_mut() {
        *verb = verb.to_lowercase();
    }
    let is_go = words.first().is_some_and(|v| v == "go");
    if let (true, Some(direction)) = (is_go, words.get_mut(1)) {
        *direction = canonical_direction(direction);
    }
    words
}

/// Map a direction word to its one-letter token. Unknown words are only
/// upper-cased.
pub fn canonical_direction(word: &str) -> String {
    let upper = word.to_uppercase();
    DIRECTION_SYNONYMS
        .iter()
        .find(|(long, _)| *long == upper)
        .map(|(_, short)| short.to_string())
        .unwrap_or(upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CommandRegistry {
        CommandRegistry::standard()
    }

    #[test]
    fn empty_input_is_a_no_op() {
        assert_eq!(registry().parse("").unwrap(), None);
        assert_eq!(registry().parse("   ").unwrap(), None);
    }

    #[test]
    fn direction_synonyms_are_canonicalised() {
        for (input, token) in [
            ("go nord", "N"),
            ("go Est", "E"),
            ("go sud", "S"),
            ("GO ouest", "O"),
            ("go up", "U"),
            ("go DOWN", "D"),
            ("go n", "N"),
        ] {
            let cmd = registry().parse(input).unwrap().unwrap();
            assert_eq!(cmd.verb, Verb::Go);
            assert_eq!(cmd.arg(), token, "{input}");
        }
    }

    #[test]
    fn unknown_direction_is_upper_cased() {
        let cmd = registry().parse("go west").unwrap().unwrap();
        assert_eq!(cmd.arg(), "WEST");
    }

    #[test]
    fn only_go_arguments_are_canonicalised() {
        assert_eq!(tokenize("take nord"), vec!["take", "nord"]);
    }

    #[test]
    fn go_requires_exactly_one_parameter() {
        for input in ["go", "go N E"] {
            let err = registry().parse(input).unwrap_err();
            assert_eq!(err.to_string(), "La commande 'go' prend 1 seul paramètre.");
        }
    }

    #[test]
    fn quit_rejects_parameters() {
        let err = registry().parse("quit now").unwrap_err();
        assert_eq!(err.to_string(), "La commande 'quit' ne prend pas de paramètre.");
        assert_eq!(registry().parse("quit").unwrap().unwrap().verb, Verb::Quit);
    }

    #[test]
    fn quest_titles_may_span_several_words() {
        let cmd = registry().parse("activate Énigme du Phare I").unwrap().unwrap();
        assert_eq!(cmd.verb, Verb::Activate);
        assert_eq!(cmd.rest(), "Énigme du Phare I");
        assert!(registry().parse("quest").is_err());
    }

    #[test]
    fn verbs_are_case_insensitive() {
        assert_eq!(registry().parse("LOOK").unwrap().unwrap().verb, Verb::Look);
    }

    #[test]
    fn unknown_verb_suggests_a_close_one() {
        match registry().parse("loook").unwrap_err() {
            GameError::UnknownCommand { verb, suggestion } => {
                assert_eq!(verb, "loook");
                assert_eq!(suggestion.as_deref(), Some("look"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unrelated_verb_gets_no_suggestion() {
        match registry().parse("xyzzy").unwrap_err() {
            GameError::UnknownCommand { suggestion, .. } => assert_eq!(suggestion, None),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn help_lists_every_command_in_order() {
        let help = registry().help();
        let first = help.find("- help").unwrap();
        let last = help.find("- rewards").unwrap();
        assert!(first < last);
        assert_eq!(help.lines().count(), 1 + registry().specs().len());
    }

    #[test]
    fn registering_twice_replaces() {
        let mut r = CommandRegistry::empty();
        r.register(CommandSpec::new("look", "", Arity::Exact(0), Verb::Look));
        r.register(CommandSpec::new("look", "", Arity::Exact(1), Verb::Look));
        assert_eq!(r.specs().len(), 1);
        assert_eq!(r.get("look").unwrap().arity, Arity::Exact(1));
    }

    #[test]
    fn arity_checks() {
        assert!(Arity::Exact(0).accepts(0));
        assert!(!Arity::Exact(0).accepts(1));
        assert!(Arity::AtLeast(1).accepts(3));
        assert!(!Arity::AtLeast(1).accepts(0));
        assert!(!Arity::Exact(0).takes_parameter());
        assert!(Arity::AtLeast(1).takes_parameter());
    }
}
