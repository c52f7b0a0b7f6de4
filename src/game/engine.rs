//! # Turn Engine
//!
//! Resolves one [`Intent`] at a time against the [`GameState`]: the player's
//! action, the fold of its result events, and then, if the player's turn
//! ended, every monster's turn.

use crate::game::{
    attack, capitalize, drop_item, take_turn, use_item, GameState, Inventory, Message,
    ResultEvent, Rgb, TurnState,
};
use crate::input::{ClickKind, Intent, LevelUpChoice};
use crate::{DelverResult, EntityId, Position};
use std::collections::VecDeque;

/// What the frontend should do after an intent was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    Continue,
    ToggleFullscreen,
    /// The session is over; the caller saves and leaves
    ExitRequested,
}

/// Outcome of the player's own action, before its events are folded.
#[derive(Debug, Default)]
struct PlayerAction {
    events: Vec<ResultEvent>,
    /// The action itself took the turn (a step or an attack)
    ends_turn: bool,
}

impl PlayerAction {
    fn events(events: Vec<ResultEvent>) -> Self {
        Self {
            events,
            ends_turn: false,
        }
    }

    fn message(message: Message) -> Self {
        Self::events(vec![ResultEvent::Message(message)])
    }

    fn turn(events: Vec<ResultEvent>) -> Self {
        Self {
            events,
            ends_turn: true,
        }
    }
}

/// What folding a batch of events did to the game.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct FoldSummary {
    ends_turn: bool,
    leveled_up: bool,
    player_died: bool,
}

impl GameState {
    /// Handles one player intent, including the enemy phase it may trigger.
    ///
    /// Intents that make no sense in the active turn state are ignored.
    pub fn handle_intent(&mut self, intent: Intent) -> DelverResult<EngineSignal> {
        self.refresh_visibility()?;
        let state = self.states.current();
        log::debug!("intent {intent:?} in {state:?}");

        let action = match (intent, state) {
            (Intent::ToggleFullscreen, _) => return Ok(EngineSignal::ToggleFullscreen),
            (Intent::Exit, state) => return self.handle_exit(state),

            (Intent::Move { dx, dy }, TurnState::PlayersTurn) => self.player_move(dx, dy)?,
            (Intent::Pickup, TurnState::PlayersTurn) => self.player_pickup()?,
            (Intent::TakeStairs, TurnState::PlayersTurn) => self.player_take_stairs()?,
            (Intent::ShowInventory, TurnState::PlayersTurn) => {
                self.states.push(TurnState::ShowInventory);
                return Ok(EngineSignal::Continue);
            }
            (Intent::DropInventory, TurnState::PlayersTurn) => {
                self.states.push(TurnState::DropInventory);
                return Ok(EngineSignal::Continue);
            }

            (Intent::InventoryIndex(index), TurnState::ShowInventory) => {
                self.player_use_item(index)?
            }
            (Intent::InventoryIndex(index), TurnState::DropInventory) => {
                self.player_drop_item(index)?
            }

            (Intent::TargetingClick { kind, position }, TurnState::Targeting) => {
                self.player_target(kind, position)?
            }

            (Intent::LevelUp(choice), TurnState::LevelUp) => {
                self.apply_level_up(choice)?;
                self.states.pop();
                PlayerAction::default()
            }

            (intent, state) => {
                log::debug!("ignoring {intent:?} in {state:?}");
                return Ok(EngineSignal::Continue);
            }
        };

        self.finish_player_action(action)?;
        if self.states.current() == TurnState::EnemyTurn {
            self.run_enemy_turn()?;
        }
        Ok(EngineSignal::Continue)
    }

    fn handle_exit(&mut self, state: TurnState) -> DelverResult<EngineSignal> {
        match state {
            TurnState::Targeting => {
                self.fold_results(vec![ResultEvent::TargetingCancelled])?;
            }
            state if state.is_modal() => {
                self.states.pop();
                if self.states.current() == TurnState::EnemyTurn {
                    self.run_enemy_turn()?;
                }
            }
            _ => return Ok(EngineSignal::ExitRequested),
        }
        Ok(EngineSignal::Continue)
    }

    fn finish_player_action(&mut self, action: PlayerAction) -> DelverResult<()> {
        let summary = self.fold_results(action.events)?;
        if summary.player_died {
            return Ok(());
        }
        if action.ends_turn || summary.ends_turn {
            self.targeting_item = None;
            self.states.reset(TurnState::EnemyTurn);
        }
        if summary.leveled_up {
            self.states.push(TurnState::LevelUp);
        }
        Ok(())
    }

    fn player_move(&mut self, dx: i32, dy: i32) -> DelverResult<PlayerAction> {
        let destination = self.player_position()? + Position::new(dx, dy);
        if self.map.is_blocked(destination) {
            return Ok(PlayerAction::default());
        }

        if let Some(target) = self.entities.blocking_entity_at(destination) {
            if self.entities.entity(target)?.fighter.is_none() {
                return Ok(PlayerAction::default());
            }
            let events = attack(&mut self.entities, self.player_id, target)?;
            return Ok(PlayerAction::turn(events));
        }

        self.player_mut()?.position = destination;
        self.mark_fov_dirty();
        Ok(PlayerAction::turn(Vec::new()))
    }

    fn player_pickup(&mut self) -> DelverResult<PlayerAction> {
        let position = self.player_position()?;
        let found = self
            .entities
            .iter()
            .find(|(id, entity)| {
                *id != self.player_id && entity.item.is_some() && entity.position == position
            })
            .map(|(id, _)| id);

        let Some(item_id) = found else {
            return Ok(PlayerAction::message(Message::new(
                "There is nothing here to pick up.",
                Rgb::YELLOW,
            )));
        };

        let item = self.entities.entity(item_id).cloned()?;
        let Some(inventory) = self.player_mut()?.inventory.as_mut() else {
            return Ok(PlayerAction::default());
        };
        match inventory.pick_up(item_id, item) {
            Ok(events) => Ok(PlayerAction::events(events)),
            Err(full) => Ok(PlayerAction::message(full.message())),
        }
    }

    fn player_take_stairs(&mut self) -> DelverResult<PlayerAction> {
        let position = self.player_position()?;
        let on_stairs = self
            .entities
            .iter()
            .any(|(_, entity)| entity.stairs.is_some() && entity.position == position);

        if !on_stairs {
            return Ok(PlayerAction::message(Message::new(
                "There are no stairs here.",
                Rgb::YELLOW,
            )));
        }

        self.next_floor()?;
        Ok(PlayerAction::default())
    }

    fn inventory_len(&self) -> DelverResult<usize> {
        Ok(self.player()?.inventory.as_ref().map_or(0, Inventory::len))
    }

    fn player_use_item(&mut self, index: usize) -> DelverResult<PlayerAction> {
        if index >= self.inventory_len()? {
            return Ok(PlayerAction::default());
        }
        let events = use_item(&mut self.entities, self.player_id, index, &self.fov, None)?;
        Ok(PlayerAction::events(events))
    }

    fn player_drop_item(&mut self, index: usize) -> DelverResult<PlayerAction> {
        if index >= self.inventory_len()? {
            return Ok(PlayerAction::default());
        }
        let events = drop_item(&mut self.entities, self.player_id, index)?;
        Ok(PlayerAction::events(events))
    }

    fn player_target(&mut self, kind: ClickKind, position: Position) -> DelverResult<PlayerAction> {
        let Some(index) = self.targeting_item else {
            self.states.pop();
            return Ok(PlayerAction::default());
        };

        match kind {
            ClickKind::Left => {
                let events = use_item(
                    &mut self.entities,
                    self.player_id,
                    index,
                    &self.fov,
                    Some(position),
                )?;
                Ok(PlayerAction::events(events))
            }
            ClickKind::Right => Ok(PlayerAction::events(vec![ResultEvent::TargetingCancelled])),
        }
    }

    fn apply_level_up(&mut self, choice: LevelUpChoice) -> DelverResult<()> {
        let player = self.player_mut()?;
        if let Some(fighter) = player.fighter.as_mut() {
            match choice {
                LevelUpChoice::Constitution => {
                    fighter.max_hp += 20;
                    fighter.hp += 20;
                }
                LevelUpChoice::Strength => fighter.power += 1,
                LevelUpChoice::Agility => fighter.defense += 1,
            }
        }
        log::debug!("level up: {choice:?}");
        Ok(())
    }

    /// Applies a batch of result events in order.
    fn fold_results(&mut self, events: Vec<ResultEvent>) -> DelverResult<FoldSummary> {
        let mut summary = FoldSummary::default();
        let mut queue: VecDeque<ResultEvent> = events.into();

        while let Some(event) = queue.pop_front() {
            summary.ends_turn |= event.ends_turn();
            match event {
                ResultEvent::Message(message) => self.message_log.add_message(message),
                ResultEvent::Damaged { target, amount } => {
                    log::debug!("{target} took {amount} damage");
                }
                ResultEvent::Died { entity, xp_reward } => {
                    if entity == self.player_id {
                        self.kill_player()?;
                        summary.player_died = true;
                    } else {
                        self.kill_monster(entity)?;
                        if xp_reward > 0 && !summary.player_died {
                            queue.push_front(ResultEvent::XpGained { xp: xp_reward });
                        }
                    }
                }
                ResultEvent::XpGained { xp } => {
                    if self.grant_xp(xp)? {
                        summary.leveled_up = true;
                    }
                }
                ResultEvent::ItemPickedUp { entity, name } => {
                    self.entities.remove(entity);
                    log::debug!("picked up {name}");
                }
                ResultEvent::ItemConsumed { name } => {
                    log::debug!("consumed {name}");
                }
                ResultEvent::ItemDropped { item } => {
                    self.entities.insert(*item);
                }
                ResultEvent::TargetingRequested { item_index } => {
                    self.begin_targeting(item_index)?;
                }
                ResultEvent::TargetingCancelled => {
                    self.targeting_item = None;
                    if self.states.current() == TurnState::Targeting {
                        self.states.pop();
                    }
                    self.message_log
                        .add_message(Message::plain("Targeting cancelled"));
                }
            }
        }

        Ok(summary)
    }

    fn begin_targeting(&mut self, item_index: usize) -> DelverResult<()> {
        let prompt = self
            .player()?
            .inventory
            .as_ref()
            .and_then(|inventory| inventory.get(item_index))
            .and_then(|entity| entity.item.as_ref())
            .and_then(|item| item.targeting_message.clone());

        self.targeting_item = Some(item_index);
        self.states.pop_to_base();
        self.states.push(TurnState::Targeting);
        if let Some(prompt) = prompt {
            self.message_log.add_message(prompt);
        }
        Ok(())
    }

    fn kill_player(&mut self) -> DelverResult<()> {
        let player = self.player_mut()?;
        player.glyph = '%';
        player.color = Rgb::DARK_RED;

        self.message_log
            .add_message(Message::new("You died!", Rgb::RED));
        self.targeting_item = None;
        self.states.reset(TurnState::PlayerDead);
        log::info!("Player died on depth {}", self.map.depth);
        Ok(())
    }

    fn kill_monster(&mut self, id: EntityId) -> DelverResult<()> {
        let entity = self.entities.entity_mut(id)?;
        let message = Message::new(format!("{} is dead!", capitalize(&entity.name)), Rgb::ORANGE);
        entity.make_corpse();
        self.message_log.add_message(message);
        Ok(())
    }

    /// Gives the player experience. Returns true on level-up.
    fn grant_xp(&mut self, xp: u32) -> DelverResult<bool> {
        let Some(level) = self.player_mut()?.level.as_mut() else {
            return Ok(false);
        };
        let leveled_up = level.add_xp(xp);
        let reached = level.current_level;

        self.message_log.add_message(Message::plain(format!(
            "You gain {xp} experience points."
        )));
        if leveled_up {
            self.message_log.add_message(Message::new(
                format!("Your battle skills grow stronger! You reached level {reached}!"),
                Rgb::YELLOW,
            ));
        }
        Ok(leveled_up)
    }

    /// Lets every monster act, in ascending entity id order. Stops at once
    /// if the player dies.
    fn run_enemy_turn(&mut self) -> DelverResult<()> {
        self.refresh_visibility()?;

        for id in self.entities.ids() {
            if id == self.player_id {
                continue;
            }
            let has_ai = self.entities.get(id).is_some_and(|e| e.ai.is_some());
            if !has_ai {
                continue;
            }

            let events = take_turn(
                &mut self.entities,
                &self.map,
                &self.fov,
                &mut self.rng,
                id,
                self.player_id,
            )?;
            let summary = self.fold_results(events)?;
            if summary.player_died {
                return Ok(());
            }
        }

        self.states.reset(TurnState::PlayersTurn);
        self.turn_number += 1;
        Ok(())
    }
}
