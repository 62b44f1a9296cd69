//! Scripted multi-step interactions.
//!
//! An [`Encounter`] is started by the session and then receives every input
//! line until it reports [`Step::Done`]. It acts on the player directly;
//! quest events it causes are folded into its output.

use std::collections::VecDeque;

use corsair_core::Player;
use serde::Deserialize;

use crate::error::{GameError, GameResult};
use crate::narrator::{Narration, gold_gained, gold_spent};

const STORM_WAVE: &str = "⚡ UNE VAGUE SCÉLÉRATE ARRIVE SUR TOI ET TON ÉQUIPAGE ! ⚡\n\
ACTION REQUISE IMMÉDIATE (Vous ne pouvez pas fuir)\n  \
1 : La prendre de face (Risque pour le navire, équipage protégé)\n  \
2 : La prendre en biais (Le navire tangue, risque de chute)\n\
Quel est ton choix (1 ou 2) ?";

const WAVE_HEAD_ON: &str = "🌊 Le bateau craque mais tient bon. L'équipage est secoué mais sauf.";
const WAVE_SIDEWAYS: &str = "🌊 Le bateau tangue violemment... Un homme passe par-dessus bord !";
const EYE_ENTERED: &str =
    "💨 Vous traversez le mur de vent et trouvez le calme temporaire de l'œil.";
const EYE_FLED: &str =
    "💨 Les vents contraires vous ralentissent. Une déferlante emporte un autre marin !";

const STORM_EYE: &str = "🌪️ Le cœur du Cyclone se rapproche...\n  \
1 : Foncez dans l'œil du cyclone (Calme mais dangereux)\n  \
2 : Tenter de fuir la zone (Long et périlleux)\n\
Quel est ton choix (1 ou 2) ?";

/// How a riddle answer is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMatch {
    /// The trimmed answer must equal the expected text.
    #[default]
    Exact,
    /// The answer must contain the expected text, ignoring case.
    Contains,
}

/// One question asked by the riddle keeper.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Riddle {
    /// Quest that must be active for the question to be asked.
    pub quest: String,
    /// Objective completed by a right answer.
    pub objective: String,
    /// The question.
    pub question: String,
    /// Expected answer.
    pub answer: String,
    /// Comparison mode.
    #[serde(default)]
    pub matching: AnswerMatch,
    /// Gold paid for a right answer.
    #[serde(default = "default_riddle_gold")]
    pub gold: u32,
    /// Reply to a right answer.
    pub correct: String,
    /// Reply to a wrong answer.
    pub wrong: String,
}

fn default_riddle_gold() -> u32 {
    5
}

impl Riddle {
    /// Check an answer.
    pub fn accepts(&self, input: &str) -> bool {
        match self.matching {
            AnswerMatch::Exact => input.trim() == self.answer,
            AnswerMatch::Contains => input
                .to_lowercase()
                .contains(&self.answer.to_lowercase()),
        }
    }
}

/// Prices of the merchant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MerchantTerms {
    /// Gold for one sailor.
    pub crew_price: u32,
    /// Item the merchant buys.
    pub goods: String,
    /// Gold paid per unit of goods.
    pub goods_price: u32,
}

/// Progress through the storm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StormStage {
    /// Facing the rogue wave.
    Wave,
    /// Approaching the eye of the cyclone.
    Eye,
}

/// Outcome of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The encounter waits for another line.
    Continue(String),
    /// The encounter is over.
    Done(String),
}

impl Step {
    /// The text to show.
    pub fn text(&self) -> &str {
        match self {
            Self::Continue(text) | Self::Done(text) => text,
        }
    }

    /// Whether the encounter ended.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// A pending scripted interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encounter {
    /// Two binary choices, each of which may cost a sailor.
    Storm {
        /// Current stage.
        stage: StormStage,
        /// Objective completed once the storm is survived.
        objective: String,
    },
    /// Questions for every active riddle quest.
    Riddles {
        /// Who asks.
        speaker: String,
        /// Questions not asked yet; the front one is awaiting its answer.
        queue: VecDeque<Riddle>,
    },
    /// Buy sailors, sell goods.
    Merchant {
        /// Who trades.
        speaker: String,
        /// Prices.
        terms: MerchantTerms,
    },
}

impl Encounter {
    /// Start the storm. Returns the encounter and its opening text.
    pub fn storm(objective: impl Into<String>) -> (Self, String) {
        let encounter = Self::Storm {
            stage: StormStage::Wave,
            objective: objective.into(),
        };
        (encounter, STORM_WAVE.to_string())
    }

    /// Start a riddle session with every riddle whose quest the player is
    /// tracking. Without any, the keeper only greets and dismisses the
    /// player and no encounter is returned.
    pub fn riddles(speaker: &str, riddles: &[Riddle], player: &Player) -> (Option<Self>, String) {
        let queue: VecDeque<Riddle> = riddles
            .iter()
            .filter(|r| player.quests().is_tracking(&r.quest))
            .cloned()
            .collect();

        let mut text = Narration::new();
        text.say(format!(
            "👴 {speaker} : 'Héhéhé ! Tu ne sortiras pas d'ici sans avoir utilisé ta tête.'"
        ));
        match queue.front() {
            Some(first) => {
                text.say(format!("👴 {speaker} : '{}'", first.question));
                let encounter = Self::Riddles {
                    speaker: speaker.to_string(),
                    queue,
                };
                (Some(encounter), text.finish())
            }
            None => {
                text.say(riddle_farewell(speaker));
                (None, text.finish())
            }
        }
    }

    /// Open the merchant's menu.
    pub fn merchant(speaker: &str, terms: MerchantTerms, player: &Player) -> (Self, String) {
        let mut text = Narration::new();
        text.say(format!(
            "💰 {speaker} : 'Bienvenue à la taverne, Capitaine !'\n\
             💰 {speaker} : 'Je peux te fournir des hommes ({} or) ou t'acheter tes {}s ({} or).'",
            terms.crew_price, terms.goods, terms.goods_price
        ));
        text.say(merchant_menu(&terms, player));
        let encounter = Self::Merchant {
            speaker: speaker.to_string(),
            terms,
        };
        (encounter, text.finish())
    }

    /// Feed one input line.
    ///
    /// An unusable answer is an error and leaves the encounter where it
    /// was.
    pub fn respond(&mut self, input: &str, player: &mut Player) -> GameResult<Step> {
        match self {
            Self::Storm { stage, objective } => {
                let risky = binary_choice(input)?;
                let mut text = Narration::new();
                match (*stage, risky) {
                    (StormStage::Wave, false) => {
                        text.say(WAVE_HEAD_ON);
                    }
                    (StormStage::Wave, true) => {
                        player.lose_crew(1);
                        text.say(WAVE_SIDEWAYS);
                    }
                    (StormStage::Eye, false) => {
                        text.say(EYE_ENTERED);
                    }
                    (StormStage::Eye, true) => {
                        player.lose_crew(1);
                        text.say(EYE_FLED);
                    }
                }
                if *stage == StormStage::Wave {
                    *stage = StormStage::Eye;
                    text.say(STORM_EYE);
                    return Ok(Step::Continue(text.finish()));
                }
                let events = player.complete_objective(objective);
                text.events(&events);
                Ok(Step::Done(text.finish()))
            }

            Self::Riddles { speaker, queue } => {
                let Some(riddle) = queue.pop_front() else {
                    return Ok(Step::Done(riddle_farewell(speaker)));
                };
                let mut text = Narration::new();
                if riddle.accepts(input) {
                    text.say(format!("👴 {speaker} : '{}'", riddle.correct));
                    let events = player.complete_objective(&riddle.objective);
                    text.events(&events);
                    player.give_gold(riddle.gold);
                    text.say(gold_gained(riddle.gold));
                } else {
                    text.say(format!("👴 {speaker} : '{}'", riddle.wrong));
                }
                match queue.front() {
                    Some(next) => {
                        text.say(format!("👴 {speaker} : '{}'", next.question));
                        Ok(Step::Continue(text.finish()))
                    }
                    None => {
                        text.say(riddle_farewell(speaker));
                        Ok(Step::Done(text.finish()))
                    }
                }
            }

            Self::Merchant { speaker, terms } => {
                let mut text = Narration::new();
                match input.trim() {
                    "1" => {
                        if player.spend_gold(terms.crew_price).is_ok() {
                            player.add_crew(1);
                            text.say(format!(
                                "{}\n⚓ Un nouveau matelot rejoint l'équipage !",
                                gold_spent(terms.crew_price)
                            ));
                        } else {
                            text.say(format!("💰 {speaker} : 'Pas assez d'argent !'"));
                        }
                    }
                    "2" => {
                        if player.inventory.remove(&terms.goods, 1).is_ok() {
                            player.give_gold(terms.goods_price);
                            text.say(format!(
                                "💰 {speaker} : 'Quelle belle bête ! Voici {} pièces d'or.'\n{}",
                                terms.goods_price,
                                gold_gained(terms.goods_price)
                            ));
                        } else {
                            text.say(format!(
                                "💰 {speaker} : 'Tu n'as pas de {} à vendre !'",
                                terms.goods
                            ));
                        }
                    }
                    "3" => {
                        return Ok(Step::Done(format!("💰 {speaker} : 'À la prochaine !'")));
                    }
                    _ => {
                        return Err(GameError::InvalidChoice {
                            expected: "1, 2 ou 3".into(),
                        });
                    }
                }
                text.say(merchant_menu(terms, player));
                Ok(Step::Continue(text.finish()))
            }
        }
    }
}

/// `"1"` is the safe choice, `"2"` the risky one.
fn binary_choice(input: &str) -> GameResult<bool> {
    match input.trim() {
        "1" => Ok(false),
        "2" => Ok(true),
        _ => Err(GameError::InvalidChoice {
            expected: "1 ou 2".into(),
        }),
    }
}

fn riddle_farewell(speaker: &str) -> String {
    format!("👴 {speaker} : 'La session est terminée.'")
}

fn merchant_menu(terms: &MerchantTerms, player: &Player) -> String {
    format!(
        "--- BOURSE: {gold} Or | ÉQUIPAGE: {crew} | {label}S: {stock} ---\n\
         1. Acheter un matelot (-{crew_price} or)\n\
         2. Vendre une {goods} (+{goods_price} or)\n\
         3. Quitter la discussion\n\
         Votre choix (1, 2 ou 3) ?",
        gold = player.gold(),
        crew = player.crew(),
        label = terms.goods.to_uppercase(),
        stock = player.inventory.quantity(&terms.goods),
        crew_price = terms.crew_price,
        goods = terms.goods,
        goods_price = terms.goods_price,
    )
}
