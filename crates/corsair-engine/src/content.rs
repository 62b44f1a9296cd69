//! World content: the serialisable description of locations, items,
//! characters, quests and scripted events, and its conversion into a live
//! [`World`].

use std::collections::HashSet;

use corsair_core::{Character, CoreError, Direction, Location, LocationId, Objective, Quest, World};
use serde::Deserialize;
use tracing::warn;

use crate::encounter::{MerchantTerms, Riddle};
use crate::error::{GameError, GameResult};

/// The built-in archipelago.
pub const ARCHIPELAGO: &str = include_str!("../data/archipelago.json");

/// A complete world description.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldContent {
    /// Name of the starting location.
    pub start: String,
    /// Every location, in order.
    pub locations: Vec<LocationDef>,
    /// Non-player characters.
    #[serde(default)]
    pub characters: Vec<CharacterDef>,
    /// Quests given to the player.
    #[serde(default)]
    pub quests: Vec<QuestDef>,
    /// Bindings of the scripted events.
    #[serde(default)]
    pub scripts: Scripts,
}

/// A location.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationDef {
    /// Unique name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Exits in display order; `null` declares a closed passage.
    #[serde(default)]
    pub exits: Vec<(Direction, Option<String>)>,
    /// Items lying here at the start.
    #[serde(default)]
    pub items: Vec<ItemDef>,
}

/// An item stack.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemDef {
    /// Item name, used by `take` and `drop`.
    pub name: String,
    /// Description.
    pub description: String,
    /// Weight of one unit, in kg.
    pub weight: f64,
    /// Units in the stack.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// A non-player character.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharacterDef {
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Starting location.
    pub location: String,
    /// Dialogue lines, cycled through by `talk`.
    #[serde(default)]
    pub messages: Vec<String>,
    /// Whether the character wanders.
    #[serde(default = "default_mobile")]
    pub mobile: bool,
}

fn default_mobile() -> bool {
    true
}

/// A quest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestDef {
    /// Unique title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Objective labels, parsed with [`Objective::parse`].
    pub objectives: Vec<String>,
    /// Reward text.
    #[serde(default)]
    pub reward: Option<String>,
    /// Activate the quest when the game starts.
    #[serde(default)]
    pub active: bool,
}

impl QuestDef {
    /// Build the inactive quest.
    pub fn to_quest(&self) -> Quest {
        Quest::new(
            self.title.clone(),
            self.description.clone(),
            self.objectives.iter().map(|o| Objective::parse(o)).collect(),
            self.reward.clone(),
        )
    }
}

/// Where the scripted events happen. Each one is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scripts {
    /// The storm sequence.
    #[serde(default)]
    pub storm: Option<StormScript>,
    /// Quests unlocked by reaching a location.
    #[serde(default)]
    pub lighthouse: Option<LighthouseScript>,
    /// The riddle keeper.
    #[serde(default)]
    pub riddles: Option<RiddleScript>,
    /// The merchant.
    #[serde(default)]
    pub merchant: Option<MerchantScript>,
    /// The guarded door.
    #[serde(default)]
    pub gate: Option<GateScript>,
}

/// Storm binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StormScript {
    /// Location that triggers the storm on first entry.
    pub location: String,
    /// Quest activated when the storm starts.
    pub quest: String,
    /// Objective completed once it is survived.
    pub objective: String,
}

/// Quests unlocked on arrival somewhere.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LighthouseScript {
    /// Location that unlocks the quests.
    pub location: String,
    /// Quests activated on each arrival.
    pub quests: Vec<String>,
    /// Shown on the first arrival only.
    pub hint: String,
}

/// Riddle keeper binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiddleScript {
    /// Character who asks.
    pub character: String,
    /// Questions, in asking order.
    pub riddles: Vec<Riddle>,
}

/// Merchant binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MerchantScript {
    /// Character who trades.
    pub character: String,
    /// Prices.
    pub terms: MerchantTerms,
}

/// Guarded door binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateScript {
    /// Location behind the door.
    pub destination: String,
    /// Character who guards it.
    pub guardian: String,
}

/// The live result of [`WorldContent::build`].
#[derive(Debug, Clone)]
pub struct BuiltWorld {
    /// The world graph with its characters.
    pub world: World,
    /// Where the player starts.
    pub start: LocationId,
    /// Every quest, inactive, in declaration order.
    pub quests: Vec<Quest>,
    /// Titles of the quests to activate at the start.
    pub initial: Vec<String>,
}

impl WorldContent {
    /// Parse a JSON description.
    pub fn from_json(text: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The built-in archipelago.
    pub fn archipelago() -> GameResult<Self> {
        Self::from_json(ARCHIPELAGO)
    }

    /// Check every reference and build the world.
    pub fn build(&self) -> GameResult<BuiltWorld> {
        let mut world = World::new();
        for def in &self.locations {
            let mut location = Location::new(def.name.clone(), def.description.clone());
            for item in &def.items {
                location
                    .inventory
                    .add(item.name.clone(), item.description.clone(), item.weight, item.quantity);
            }
            world.add_location(location).map_err(content_error)?;
        }

        for def in &self.locations {
            let from = world.require_location(&def.name).map_err(content_error)?;
            for (direction, target) in &def.exits {
                match target {
                    Some(name) => {
                        let to = world.find_location(name).ok_or_else(|| {
                            GameError::Content(format!(
                                "exit {direction} of \"{}\" leads to unknown location \"{name}\"",
                                def.name
                            ))
                        })?;
                        world.connect(from, *direction, to);
                    }
                    None => world.close_exit(from, *direction),
                }
            }
        }

        let mut names = HashSet::new();
        for def in &self.characters {
            if !names.insert(def.name.as_str()) {
                return Err(GameError::Content(format!(
                    "character already exists: \"{}\"",
                    def.name
                )));
            }
            let at = world.require_location(&def.location).map_err(content_error)?;
            world.add_character(
                Character::new(def.name.clone(), def.description.clone(), at, def.messages.clone())
                    .with_mobile(def.mobile),
            );
        }

        let start = world.require_location(&self.start).map_err(content_error)?;

        let mut titles = HashSet::new();
        for quest in &self.quests {
            if !titles.insert(quest.title.as_str()) {
                warn!(quest = %quest.title, "duplicate quest title, the last one wins");
            }
        }

        self.scripts.validate(&world, &names, &titles)?;

        Ok(BuiltWorld {
            world,
            start,
            quests: self.quests.iter().map(QuestDef::to_quest).collect(),
            initial: self
                .quests
                .iter()
                .filter(|q| q.active)
                .map(|q| q.title.clone())
                .collect(),
        })
    }
}

impl Scripts {
    fn validate(
        &self,
        world: &World,
        characters: &HashSet<&str>,
        quests: &HashSet<&str>,
    ) -> GameResult<()> {
        let location = |name: &str| world.require_location(name).map(|_| ()).map_err(content_error);
        let character = |name: &str| {
            if characters.contains(name) {
                Ok(())
            } else {
                Err(GameError::Content(format!("unknown character \"{name}\"")))
            }
        };
        let quest = |title: &str| {
            if quests.contains(title) {
                Ok(())
            } else {
                Err(GameError::Content(format!("unknown quest \"{title}\"")))
            }
        };

        if let Some(storm) = &self.storm {
            location(&storm.location)?;
            quest(&storm.quest)?;
        }
        if let Some(lighthouse) = &self.lighthouse {
            location(&lighthouse.location)?;
            for title in &lighthouse.quests {
                quest(title)?;
            }
        }
        if let Some(riddles) = &self.riddles {
            character(&riddles.character)?;
            for riddle in &riddles.riddles {
                quest(&riddle.quest)?;
            }
        }
        if let Some(merchant) = &self.merchant {
            character(&merchant.character)?;
        }
        if let Some(gate) = &self.gate {
            location(&gate.destination)?;
            character(&gate.guardian)?;
        }
        Ok(())
    }
}

fn content_error(err: CoreError) -> GameError {
    GameError::Content(err.to_string())
}
