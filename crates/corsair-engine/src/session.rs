//! The game session: one player in one world, driven a line at a time.

use corsair_core::{CoinFlipWander, CoreError, Direction, Location, LocationId, Player, World};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::command::{Command, CommandRegistry, Verb};
use crate::config::{BackPolicy, GameConfig};
use crate::content::{Scripts, WorldContent};
use crate::encounter::{Encounter, Step};
use crate::error::{GameError, GameResult};
use crate::gate::{CrewGate, Gate};
use crate::narrator::Narration;

/// A running game.
pub struct Game {
    world: World,
    player: Player,
    commands: CommandRegistry,
    gates: Vec<(LocationId, Box<dyn Gate>)>,
    scripts: Scripts,
    config: GameConfig,
    rng: StdRng,
    wander: CoinFlipWander,
    pending: Option<Encounter>,
    opening: Narration,
    storm_done: bool,
    hint_given: bool,
    finished: bool,
}

impl Game {
    /// Start a game in the built-in archipelago.
    pub fn new(player_name: &str, config: GameConfig) -> GameResult<Self> {
        Self::with_world(&WorldContent::archipelago()?, player_name, config)
    }

    /// Start a game in the given world.
    ///
    /// The quests marked active are activated and the starting room is
    /// checked against them right away.
    pub fn with_world(
        content: &WorldContent,
        player_name: &str,
        config: GameConfig,
    ) -> GameResult<Self> {
        let built = content.build()?;
        let mut player = Player::new(player_name, built.start)?.with_crew(config.starting_crew);
        for quest in built.quests {
            player.add_quest(quest);
        }

        let mut opening = Narration::new();
        for title in &built.initial {
            if let Some(event) = player.activate_quest(title) {
                opening.events(&[event]);
            }
        }
        let start_name = built.world.location(built.start).name.clone();
        opening.events(&player.check_room(&start_name));

        let mut gates: Vec<(LocationId, Box<dyn Gate>)> = Vec::new();
        if let Some(gate) = &content.scripts.gate {
            let at = built
                .world
                .require_location(&gate.destination)
                .map_err(|e| GameError::Content(e.to_string()))?;
            let gate: Box<dyn Gate> = Box::new(CrewGate::new(&gate.guardian, config.crew_quota));
            gates.push((at, gate));
        }

        info!(player = %player.name, seed = config.seed, "game started");
        Ok(Self {
            world: built.world,
            player,
            commands: CommandRegistry::standard(),
            gates,
            scripts: content.scripts.clone(),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            wander: CoinFlipWander::default(),
            pending: None,
            opening,
            storm_done: false,
            hint_given: false,
            finished: false,
        })
    }

    /// The world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable access to the player, for scripted setups.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Whether `quit` was entered.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a scripted encounter is waiting for an answer.
    pub fn in_encounter(&self) -> bool {
        self.pending.is_some()
    }

    /// Greeting, starting room and the quest events of the setup.
    pub fn welcome(&self) -> String {
        let mut text = Narration::new();
        text.say(format!(
            "Bienvenue {} ! Votre équipage de {} hommes est prêt.",
            self.player.name,
            self.player.crew()
        ));
        text.say(self.here().long_description());
        text.extend(self.opening.clone());
        text.finish()
    }

    /// Run one turn.
    ///
    /// While an encounter is pending the line answers it. Otherwise the
    /// line is parsed and dispatched; after a successful `go` or `back`,
    /// every mobile character may wander.
    pub fn process(&mut self, line: &str) -> GameResult<String> {
        if let Some(encounter) = self.pending.take() {
            return self.answer(encounter, line);
        }

        let Some(command) = self.commands.parse(line)? else {
            return Ok(String::new());
        };
        debug!(verb = ?command.verb, args = ?command.args, "dispatch");

        let mut text = self.execute(&command)?;
        if command.verb.is_movement() {
            text.extend(self.tick_characters());
        }
        Ok(text.finish())
    }

    fn answer(&mut self, mut encounter: Encounter, line: &str) -> GameResult<String> {
        match encounter.respond(line, &mut self.player) {
            Ok(Step::Continue(text)) => {
                self.pending = Some(encounter);
                Ok(text)
            }
            Ok(Step::Done(text)) => Ok(text),
            Err(err) => {
                self.pending = Some(encounter);
                Err(err)
            }
        }
    }

    fn execute(&mut self, command: &Command) -> GameResult<Narration> {
        let mut text = Narration::new();
        match command.verb {
            Verb::Help => {
                text.say(self.commands.help());
            }
            Verb::Quit => {
                self.finished = true;
                info!(
                    player = %self.player.name,
                    moves = self.player.move_count(),
                    "game finished"
                );
                text.say(format!("Merci {} d'avoir joué. Au revoir.", self.player.name));
            }
            Verb::Go => return self.go(command.arg()),
            Verb::Back => return self.back(),
            Verb::History => {
                text.say(self.player.history_summary(&self.world));
            }
            Verb::Look => {
                text.say(self.look());
            }
            Verb::Check => {
                text.say(self.player.inventory_summary());
            }
            Verb::Take => {
                let item = command.arg();
                self.player.take(&mut self.world, item)?;
                text.say(format!("Vous avez pris '{item}'."));
            }
            Verb::Drop => {
                let item = command.arg();
                self.player.drop_item(&mut self.world, item)?;
                text.say(format!("Vous avez reposé '{item}' dans la pièce."));
            }
            Verb::Talk => return self.talk(command.arg()),
            Verb::Quests => {
                text.say(self.player.quests().overview());
            }
            Verb::Quest => {
                let details = self
                    .player
                    .quests()
                    .details(&command.rest(), &self.player.counters())?;
                text.say(details);
            }
            Verb::Activate => {
                let title = command.rest();
                let event = self
                    .player
                    .activate_quest(&title)
                    .ok_or(CoreError::QuestNotActivatable(title))?;
                text.events(&[event]);
            }
            Verb::Rewards => {
                text.say(self.player.rewards_summary());
            }
        }
        Ok(text)
    }

    fn go(&mut self, token: &str) -> GameResult<Narration> {
        let direction =
            Direction::parse(token).ok_or_else(|| GameError::UnknownDirection(token.to_string()))?;

        let mut text = Narration::new();
        if let Some(next) = self.here().get_exit(direction) {
            for (_, gate) in self.gates.iter().filter(|(at, _)| *at == next) {
                if let Some(line) = gate.check(&self.player)? {
                    text.say(line);
                }
            }
        }

        let events = self.player.move_to(&self.world, direction)?;
        text.say(self.here().long_description());
        text.say(self.player.history_summary(&self.world));
        text.events(&events);
        text.extend(self.room_events());
        Ok(text)
    }

    fn back(&mut self) -> GameResult<Narration> {
        self.player.back()?;
        let mut text = Narration::new();
        text.say(format!(
            "Vous êtes maintenant dans : {}",
            self.here().long_description()
        ));
        if self.config.back_policy == BackPolicy::Replay {
            let room = self.here().name.clone();
            text.events(&self.player.check_room(&room));
            text.extend(self.room_events());
        }
        Ok(text)
    }

    fn look(&self) -> String {
        let here = self.here();
        let mut out = format!("{}\n{}\n", here.long_description(), here.describe_inventory());
        let characters = self.world.characters_at(self.player.location());
        if characters.is_empty() {
            out.push_str("Il n'y a pas de PNJ ici.");
        } else {
            out.push_str("PNJ présents :");
            for character in characters {
                out.push_str(&format!("\n - {character}"));
            }
        }
        out
    }

    fn talk(&mut self, query: &str) -> GameResult<Narration> {
        let at = self.player.location();
        let id = self
            .world
            .find_character_at(at, query)
            .ok_or_else(|| CoreError::CharacterNotHere(query.to_string()))?;
        let name = self.world.character(id).name.clone();

        let mut text = Narration::new();
        if let Some(script) = self.scripts.riddles.as_ref().filter(|s| s.character == name) {
            let (encounter, opening) = Encounter::riddles(&name, &script.riddles, &self.player);
            self.pending = encounter;
            text.say(opening);
        } else if let Some(script) = self
            .scripts
            .merchant
            .as_ref()
            .filter(|s| s.character == name)
        {
            let (encounter, opening) =
                Encounter::merchant(&name, script.terms.clone(), &self.player);
            self.pending = Some(encounter);
            text.say(opening);
        } else {
            let character = self.world.character_mut(id);
            match character.next_message() {
                Some(message) => text.say(format!("{name} : '{message}'")),
                None => text.say(format!("{name} n'a rien à dire.")),
            };
        }

        let events = self.player.record_action("Parler", Some(&name));
        text.events(&events);
        Ok(text)
    }

    /// One-shot and repeated events of the room just entered.
    fn room_events(&mut self) -> Narration {
        let mut text = Narration::new();
        let room = self.here().name.clone();

        let storm_done = self.storm_done;
        if let Some(storm) = self
            .scripts
            .storm
            .as_ref()
            .filter(|s| s.location == room && !storm_done)
        {
            self.storm_done = true;
            if let Some(event) = self.player.activate_quest(&storm.quest) {
                text.events(&[event]);
            }
            let (encounter, opening) = Encounter::storm(storm.objective.clone());
            self.pending = Some(encounter);
            text.say(opening);
        }

        if let Some(lighthouse) = self.scripts.lighthouse.as_ref().filter(|l| l.location == room) {
            for title in &lighthouse.quests {
                if let Some(event) = self.player.activate_quest(title) {
                    text.events(&[event]);
                }
            }
            if !self.hint_given {
                self.hint_given = true;
                text.say(lighthouse.hint.clone());
            }
        }
        text
    }

    /// Let every mobile character take one step, in world order.
    fn tick_characters(&mut self) -> Narration {
        let mut text = Narration::new();
        let mobile: Vec<_> = self
            .world
            .characters()
            .filter(|(_, c)| c.mobile)
            .map(|(id, _)| id)
            .collect();

        for id in mobile {
            let moved = self.world.wander(id, &self.wander, &mut self.rng);
            if !self.config.debug {
                continue;
            }
            let name = &self.world.character(id).name;
            match moved {
                Some((from, to)) => text.say(format!(
                    "DEBUG: {name} s'est déplacé de '{}' vers '{}'.",
                    self.world.location(from).name,
                    self.world.location(to).name
                )),
                None => text.say(format!("DEBUG: {name} a décidé de ne pas bouger.")),
            };
        }
        text
    }

    fn here(&self) -> &Location {
        self.world.location(self.player.location())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corsair_core::QuestStatus;

    fn game() -> Game {
        Game::new("Jack", GameConfig::default()).unwrap()
    }

    fn hold_still(game: &mut Game) {
        let ids: Vec<_> = game.world.characters().map(|(id, _)| id).collect();
        for id in ids {
            game.world.character_mut(id).mobile = false;
        }
    }

    fn room(game: &Game) -> &str {
        &game.world().location(game.player().location()).name
    }

    #[test]
    fn invalid_name_is_rejected() {
        assert!(matches!(
            Game::new("J", GameConfig::default()),
            Err(GameError::Core(CoreError::InvalidName { .. }))
        ));
    }

    #[test]
    fn welcome_greets_and_checks_the_start_room() {
        let g = game();
        let text = g.welcome();
        assert!(text.starts_with("Bienvenue Jack ! Votre équipage de 5 hommes est prêt."));
        assert!(text.contains("Vous venez d'arriver dans un vaste océan"));
        assert!(text.contains("🗡️  Nouvelle quête activée: Grand Explorateur"));
        assert!(text.contains("✅ Objectif accompli: Visiter un vaste océan"));
        let explorer = g.player().quests().quest("Grand Explorateur").unwrap();
        assert_eq!(explorer.completed_objectives().len(), 1);
    }

    #[test]
    fn empty_line_does_nothing() {
        let mut g = game();
        assert_eq!(g.process("").unwrap(), "");
        assert_eq!(g.process("   ").unwrap(), "");
    }

    #[test]
    fn go_moves_and_reports() {
        let mut g = game();
        let text = g.process("go est").unwrap();
        assert_eq!(room(&g), "la Taverne");
        assert!(text.contains("Vous venez d'arriver dans la Taverne"));
        assert!(text.contains("- un vaste océan"));
        assert!(text.contains("✅ Objectif accompli: Visiter la Taverne"));
    }

    #[test]
    fn go_arity_is_enforced() {
        let mut g = game();
        for line in ["go", "go N E"] {
            let err = g.process(line).unwrap_err();
            assert_eq!(err.to_string(), "La commande 'go' prend 1 seul paramètre.");
        }
        assert_eq!(room(&g), "un vaste océan");
        assert_eq!(g.player().move_count(), 0);
    }

    #[test]
    fn quit_with_argument_does_not_finish() {
        let mut g = game();
        assert!(g.process("quit maintenant").is_err());
        assert!(!g.is_finished());
        let text = g.process("quit").unwrap();
        assert!(g.is_finished());
        assert_eq!(text, "Merci Jack d'avoir joué. Au revoir.");
    }

    #[test]
    fn missing_exit_messages() {
        let mut g = game();
        g.process("go E").unwrap();
        let err = g.process("go N").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Notre perroquet n'a aperçu aucune île dans cette direction !"
        );
        let err = g.process("go U").unwrap_err();
        assert_eq!(err.to_string(), "Il n'y a pas d'échelle pour monter ou descendre !");
        let err = g.process("go X").unwrap_err();
        assert!(matches!(err, GameError::UnknownDirection(d) if d == "X"));
        assert_eq!(room(&g), "la Taverne");
    }

    #[test]
    fn back_restores_and_fails_on_empty_history() {
        let mut g = game();
        assert!(matches!(
            g.process("back"),
            Err(GameError::Core(CoreError::NoHistory))
        ));
        g.process("go E").unwrap();
        let text = g.process("back").unwrap();
        assert!(
            text.starts_with("Vous êtes maintenant dans : Vous venez d'arriver dans un vaste océan")
        );
        assert_eq!(room(&g), "un vaste océan");
        assert!(g.player().history().is_empty());
    }

    #[test]
    fn guardian_blocks_a_small_crew() {
        let mut g = game();
        g.process("go O").unwrap();
        assert_eq!(room(&g), "Treasure Island");

        let err = g.process("go D").unwrap_err();
        assert!(matches!(err, GameError::GateRefused(_)));
        assert!(err.to_string().contains("(Vous n'avez que 5 hommes.)"));
        assert_eq!(room(&g), "Treasure Island");
        assert_eq!(g.player().move_count(), 1);
    }

    #[test]
    fn guardian_lets_a_full_crew_through() {
        let mut g = Game::new("Jack", GameConfig::default().with_starting_crew(8)).unwrap();
        g.process("go O").unwrap();
        let text = g.process("go D").unwrap();
        assert!(text.starts_with("🔓 Gardien"));
        assert_eq!(room(&g), "la cave aux trésors");
    }

    #[test]
    fn take_and_drop_round_trip() {
        let mut g = game();
        g.process("go E").unwrap();
        assert_eq!(g.process("take pièce").unwrap(), "Vous avez pris 'pièce'.");
        assert_eq!(g.player().gold(), 1);
        assert!(g.process("take tortue").is_err());
        g.process("drop pièce").unwrap();
        assert_eq!(g.player().gold(), 0);
        assert_eq!(
            g.world().location(g.player().location()).inventory.quantity("pièce"),
            10
        );
        assert!(matches!(
            g.process("drop pièce"),
            Err(GameError::Core(CoreError::ItemNotCarried(_)))
        ));
    }

    #[test]
    fn look_lists_items_and_characters() {
        let mut g = game();
        hold_still(&mut g);
        g.process("go E").unwrap();
        let text = g.process("look").unwrap();
        assert!(text.contains("    - pièce : une pièce d'or (0.1 kg)"));
        assert!(text.contains("PNJ présents :\n - Marchand : recruteur"));

        g.process("back").unwrap();
        let text = g.process("look").unwrap();
        assert!(text.contains("Il n'y a rien ici."));
        assert!(text.contains("Il n'y a pas de PNJ ici."));
    }

    #[test]
    fn plain_talk_cycles_messages() {
        let mut g = game();
        g.process("go O").unwrap();
        let first = g.process("talk gardien").unwrap();
        assert_eq!(first, "Gardien : 'Seul un capitaine digne passera.'");
        assert!(matches!(
            g.process("talk fouras"),
            Err(GameError::Core(CoreError::CharacterNotHere(_)))
        ));
    }

    #[test]
    fn storm_runs_once_and_routes_input() {
        let mut g = game();
        let text = g.process("go S").unwrap();
        assert!(text.contains("Nouvelle quête activée: Esquiver la tempête"));
        assert!(text.contains("VAGUE SCÉLÉRATE"));
        assert!(g.in_encounter());

        // not a command while the storm is raging
        assert!(matches!(
            g.process("look"),
            Err(GameError::InvalidChoice { .. })
        ));
        g.process("2").unwrap();
        let text = g.process("1").unwrap();
        assert!(text.contains("🏆 Quête terminée: Esquiver la tempête"));
        assert!(!g.in_encounter());
        assert_eq!(g.player().crew(), 4);
        assert_eq!(
            g.player().quests().quest("Esquiver la tempête").unwrap().status(),
            QuestStatus::Completed
        );

        // leaving and coming back does not raise a second storm
        g.process("go E").unwrap();
        g.process("back").unwrap();
        assert!(!g.in_encounter());
    }

    fn two_rooms() -> WorldContent {
        WorldContent::from_json(
            r#"{
                "start": "a",
                "locations": [
                    { "name": "a", "description": "le quai.", "exits": [["E", "b"]] },
                    { "name": "b", "description": "la plage.", "exits": [["O", "a"]] }
                ],
                "quests": [
                    { "title": "Retour", "description": "", "objectives": ["Visiter a"] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn correction_policy_ignores_the_room_on_back() {
        let mut g = Game::with_world(&two_rooms(), "Jack", GameConfig::default()).unwrap();
        g.process("go E").unwrap();
        g.process("activate Retour").unwrap();
        let text = g.process("back").unwrap();
        assert!(!text.contains("Objectif accompli"));
        assert!(g.player().quests().is_tracking("Retour"));
    }

    #[test]
    fn replay_policy_checks_the_room_on_back() {
        let config = GameConfig::default().with_back_policy(BackPolicy::Replay);
        let mut g = Game::with_world(&two_rooms(), "Jack", config).unwrap();
        g.process("go E").unwrap();
        g.process("activate Retour").unwrap();
        let text = g.process("back").unwrap();
        assert!(text.contains("✅ Objectif accompli: Visiter a"));
        assert!(g.player().quests().quest("Retour").unwrap().is_completed());
    }

    #[test]
    fn storm_is_one_shot_under_replay() {
        let config = GameConfig::default().with_back_policy(BackPolicy::Replay);
        let mut g = Game::new("Jack", config).unwrap();
        g.process("go S").unwrap();
        g.process("1").unwrap();
        g.process("1").unwrap();
        g.process("go E").unwrap();
        g.process("back").unwrap();
        assert!(!g.in_encounter());
    }

    #[test]
    fn lighthouse_unlocks_riddles_and_hints_once() {
        let mut g = game();
        g.process("go N").unwrap();
        let text = g.process("go E").unwrap();
        assert!(text.contains("Nouvelle quête activée: Énigme du Phare I"));
        assert!(text.contains("Nouvelle quête activée: Énigme du Phare II"));
        assert!(text.contains("💡"));
        assert!(g.player().quests().is_tracking("Énigme du Phare I"));

        g.process("go S").unwrap();
        g.process("go O").unwrap();
        g.process("go N").unwrap();
        let text = g.process("go E").unwrap();
        assert!(!text.contains("💡"));
    }

    #[test]
    fn riddles_pay_out() {
        let mut g = game();
        g.process("go N").unwrap();
        g.process("go E").unwrap();

        // Fouras wanders; put him back in the lighthouse for the test
        let here = g.player().location();
        let fouras = g
            .world()
            .characters()
            .find(|(_, c)| c.name == "Fouras")
            .map(|(id, _)| id)
            .unwrap();
        g.world.place_character(fouras, here);

        let text = g.process("talk Fouras").unwrap();
        assert!(text.contains("Question 1"));
        g.process("9").unwrap();
        let text = g.process("perroquet").unwrap();
        assert!(text.contains("La session est terminée"));
        assert!(!g.in_encounter());
        assert_eq!(g.player().gold(), 10);
        assert_eq!(g.player().rewards(), &["5 pièces d'or".to_string()]);
    }

    #[test]
    fn merchant_recruits_until_the_door_opens() {
        let mut g = game();
        g.process("go E").unwrap();
        g.player_mut().give_gold(15);

        let text = g.process("talk marchand").unwrap();
        assert!(text.contains("Bienvenue à la taverne, Capitaine !"));
        for _ in 0..3 {
            g.process("1").unwrap();
        }
        g.process("3").unwrap();
        assert!(!g.in_encounter());
        assert_eq!(g.player().crew(), 8);
        assert_eq!(g.player().gold(), 0);

        g.process("go O").unwrap();
        g.process("go O").unwrap();
        g.process("go D").unwrap();
        assert_eq!(room(&g), "la cave aux trésors");
    }

    #[test]
    fn activate_and_inspect_quests() {
        let mut g = game();
        let text = g.process("activate Loup de mer").unwrap();
        assert!(text.contains("Nouvelle quête activée: Loup de mer"));
        assert!(matches!(
            g.process("activate Loup de mer"),
            Err(GameError::Core(CoreError::QuestNotActivatable(_)))
        ));
        assert!(g.process("activate Inconnue").is_err());

        g.process("go E").unwrap();
        let details = g.process("quest Loup de mer").unwrap();
        assert!(details.contains("Se déplacer 10 fois (Progression: 1/10)"));
        assert!(matches!(
            g.process("quest Inconnue"),
            Err(GameError::Core(CoreError::QuestNotFound(_)))
        ));

        let overview = g.process("quests").unwrap();
        assert!(overview.contains("⏳ Grand Explorateur (2/7 objectifs)"));
        assert!(overview.contains("❓ Esquiver la tempête (Non activée)"));
    }

    #[test]
    fn move_counter_quest_completes_on_the_tenth_move() {
        let mut g = game();
        g.process("activate Loup de mer").unwrap();
        for step in 1..=10 {
            let line = if step % 2 == 1 { "go E" } else { "go O" };
            let text = g.process(line).unwrap();
            assert_eq!(
                text.contains("🏆 Quête terminée: Loup de mer"),
                step == 10,
                "move {step}"
            );
        }
        assert!(g.process("rewards").unwrap().contains("Longue-vue du loup de mer"));
    }

    #[test]
    fn debug_traces_follow_movement_commands_only() {
        let mut g = Game::new("Jack", GameConfig::default().with_debug(true)).unwrap();
        let text = g.process("go E").unwrap();
        assert!(text.contains("DEBUG: Fouras"));
        assert!(!text.contains("DEBUG: Marchand"));
        let text = g.process("look").unwrap();
        assert!(!text.contains("DEBUG"));
    }

    #[test]
    fn same_seed_same_wandering() {
        let run = |seed| {
            let config = GameConfig::default().with_seed(seed).with_debug(true);
            let mut g = Game::new("Jack", config).unwrap();
            (0..6)
                .map(|i| g.process(if i % 2 == 0 { "go E" } else { "go O" }).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn unknown_command_suggests() {
        let mut g = game();
        let err = g.process("histroy").unwrap_err();
        assert!(err.to_string().contains("'history'"));
    }

    #[test]
    fn help_and_history() {
        let mut g = game();
        assert!(g.process("help").unwrap().contains("\t- go <direction>"));
        assert!(g.process("history").unwrap().contains("(aucune pour le moment)"));
        assert!(g.process("check").unwrap().starts_with("Équipage : 5 hommes"));
    }
}
