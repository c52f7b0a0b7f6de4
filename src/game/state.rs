//! # Game State Module
//!
//! Central game state and the turn-state stack.
//!
//! [`GameState`] owns everything that makes up a running game: the current
//! floor, its entities, the message log and the stack of turn states. The
//! turn engine in `engine.rs` drives it one intent at a time.

use crate::config::GameConfig;
use crate::game::{
    Entity, EntityArena, FovMap, GameMap, Message, MessageLog, Rgb, VisibilityProvider,
};
use crate::generation::{create_rng, Generator, RoomCorridorGenerator};
use crate::{DelverError, DelverResult, EntityId, Position};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Whose turn it is, or which menu has the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    PlayersTurn,
    EnemyTurn,
    PlayerDead,
    ShowInventory,
    DropInventory,
    Targeting,
    LevelUp,
}

impl TurnState {
    /// Modal states interrupt gameplay and are popped to return to it.
    pub fn is_modal(self) -> bool {
        matches!(
            self,
            TurnState::ShowInventory
                | TurnState::DropInventory
                | TurnState::Targeting
                | TurnState::LevelUp
        )
    }
}

/// Stack of turn states. The top is the active state; it is never empty.
///
/// # Examples
///
/// ```
/// use delver::{StateStack, TurnState};
///
/// let mut states = StateStack::new(TurnState::PlayersTurn);
/// states.push(TurnState::ShowInventory);
/// assert_eq!(states.current(), TurnState::ShowInventory);
/// states.pop();
/// assert_eq!(states.current(), TurnState::PlayersTurn);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateStack {
    stack: Vec<TurnState>,
}

impl StateStack {
    pub fn new(base: TurnState) -> Self {
        Self { stack: vec![base] }
    }

    /// The active state.
    pub fn current(&self) -> TurnState {
        self.stack.last().copied().unwrap_or(TurnState::PlayersTurn)
    }

    /// Enters `state`, remembering the one it interrupts.
    pub fn push(&mut self, state: TurnState) {
        log::debug!("state: push {state:?}");
        self.stack.push(state);
    }

    /// Leaves the active state. The bottom state is never popped.
    pub fn pop(&mut self) -> Option<TurnState> {
        if self.stack.len() > 1 {
            let popped = self.stack.pop();
            log::debug!("state: pop {popped:?}, now {:?}", self.current());
            popped
        } else {
            None
        }
    }

    /// Discards every state and starts over from `state`.
    pub fn reset(&mut self, state: TurnState) {
        log::debug!("state: reset to {state:?}");
        self.stack.clear();
        self.stack.push(state);
    }

    /// Pops every modal state, back to the bottom of the stack.
    pub fn pop_to_base(&mut self) {
        self.stack.truncate(1);
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TurnState> {
        self.stack.iter()
    }
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new(TurnState::PlayersTurn)
    }
}

fn default_fov_dirty() -> bool {
    true
}

fn default_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Central game state containing all game data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Settings the game was started with
    pub config: GameConfig,
    /// The current floor
    pub map: GameMap,
    /// Everything on the current floor, the player included
    pub entities: EntityArena,
    /// The player entity ID
    pub player_id: EntityId,
    pub message_log: MessageLog,
    pub states: StateStack,
    /// Inventory slot awaiting a target while in targeting mode
    pub targeting_item: Option<usize>,
    /// Completed enemy phases
    pub turn_number: u64,
    /// Random number generator seed
    pub seed: u64,
    #[serde(skip)]
    pub fov: FovMap,
    /// Visibility must be recomputed before it is next read
    #[serde(skip, default = "default_fov_dirty")]
    pub fov_dirty: bool,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: StdRng,
}

impl GameState {
    /// Starts a new game on a freshly generated first floor.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::{GameConfig, GameState, TurnState};
    ///
    /// let state = GameState::new(GameConfig::default(), 12345).unwrap();
    /// assert_eq!(state.states.current(), TurnState::PlayersTurn);
    /// assert_eq!(state.map.depth, 1);
    /// ```
    pub fn new(config: GameConfig, seed: u64) -> DelverResult<Self> {
        config.validate()?;

        let mut rng = create_rng(seed);
        let floor = RoomCorridorGenerator::new().generate(&config.generation, 1, &mut rng)?;
        let player = Entity::player(floor.player_start, &config.player);

        let mut state = Self::assemble(config, floor.map, player, seed, rng)?;
        for entity in floor.entities {
            state.entities.insert(entity);
        }
        log::info!("New game with seed {seed}");
        Ok(state)
    }

    /// Starts a game on a prepared map with only the given player on it.
    pub fn new_with_map(
        config: GameConfig,
        map: GameMap,
        player: Entity,
        seed: u64,
    ) -> DelverResult<Self> {
        if player.fighter.is_none() {
            return Err(DelverError::Configuration(
                "the player needs a fighter component".to_string(),
            ));
        }
        Self::assemble(config, map, player, seed, create_rng(seed))
    }

    fn assemble(
        config: GameConfig,
        map: GameMap,
        player: Entity,
        seed: u64,
        rng: StdRng,
    ) -> DelverResult<Self> {
        let message_log = MessageLog::new(config.messages.width, config.messages.height)?;
        let mut entities = EntityArena::new();
        let player_id = entities.insert(player);
        let fov = FovMap::new(map.width, map.height);

        Ok(Self {
            config,
            map,
            entities,
            player_id,
            message_log,
            states: StateStack::new(TurnState::PlayersTurn),
            targeting_item: None,
            turn_number: 0,
            seed,
            fov,
            fov_dirty: true,
            rng,
        })
    }

    /// Adds an entity to the current floor.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        self.entities.insert(entity)
    }

    pub fn player(&self) -> DelverResult<&Entity> {
        self.entities
            .get(self.player_id)
            .ok_or_else(|| DelverError::InvalidState("No player found".to_string()))
    }

    pub fn player_mut(&mut self) -> DelverResult<&mut Entity> {
        self.entities
            .get_mut(self.player_id)
            .ok_or_else(|| DelverError::InvalidState("No player found".to_string()))
    }

    pub fn player_position(&self) -> DelverResult<Position> {
        Ok(self.player()?.position)
    }

    /// The active turn state.
    pub fn current_state(&self) -> TurnState {
        self.states.current()
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Requests a visibility recompute before the next read.
    pub fn mark_fov_dirty(&mut self) {
        self.fov_dirty = true;
    }

    /// Recomputes the player's field of view if it is dirty, marking every
    /// visible tile explored.
    pub fn refresh_visibility(&mut self) -> DelverResult<()> {
        if !self.fov_dirty {
            return Ok(());
        }

        let origin = self.player_position()?;
        self.fov.compute(
            &self.map,
            origin,
            self.config.fov.radius,
            self.config.fov.light_walls,
        );
        for pos in self.fov.visible_positions() {
            self.map.mark_explored(pos);
        }
        self.fov_dirty = false;
        Ok(())
    }

    /// Whether `pos` was visible at the last recompute.
    pub fn is_visible(&self, pos: Position) -> bool {
        self.fov.is_visible(pos)
    }

    /// Descends to a new floor.
    ///
    /// Only the player survives the trip: it is placed at the new floor's
    /// spawn and recovers half its maximum hit points. The message log is
    /// kept.
    pub fn next_floor(&mut self) -> DelverResult<()> {
        let depth = self.map.depth + 1;
        let floor =
            RoomCorridorGenerator::new().generate(&self.config.generation, depth, &mut self.rng)?;

        let mut player = self
            .entities
            .remove(self.player_id)
            .ok_or_else(|| DelverError::InvalidState("No player found".to_string()))?;
        player.position = floor.player_start;
        if let Some(fighter) = player.fighter.as_mut() {
            fighter.heal(fighter.max_hp / 2);
        }

        self.player_id = self.entities.reset_with(player);
        for entity in floor.entities {
            self.entities.insert(entity);
        }
        self.map = floor.map;
        self.fov = FovMap::new(self.map.width, self.map.height);
        self.fov_dirty = true;

        self.message_log.add_message(Message::new(
            "You take a moment to rest, and recover your strength.",
            Rgb::LIGHT_VIOLET,
        ));
        log::info!("Descended to depth {depth}");
        Ok(())
    }

    /// Rebuilds the parts of the state that are not saved.
    pub fn restore_runtime(&mut self) {
        self.fov = FovMap::new(self.map.width, self.map.height);
        self.fov_dirty = true;
        self.rng = create_rng(self.seed ^ self.turn_number.rotate_left(32));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;

    fn small_config() -> GameConfig {
        GameConfig {
            generation: crate::GenerationConfig::for_testing(),
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_game_state_creation() {
        let state = GameState::new(small_config(), 12345).unwrap();
        assert_eq!(state.turn_number, 0);
        assert_eq!(state.seed, 12345);
        assert_eq!(state.player_id, EntityId(0));
        assert!(state.entities.len() >= 2);
        assert!(state
            .entities
            .iter()
            .any(|(_, entity)| entity.stairs.is_some()));
    }

    #[test]
    fn test_state_stack_never_empties() {
        let mut states = StateStack::new(TurnState::PlayersTurn);
        assert!(states.pop().is_none());
        assert_eq!(states.current(), TurnState::PlayersTurn);

        states.push(TurnState::ShowInventory);
        states.push(TurnState::Targeting);
        assert_eq!(states.depth(), 3);
        states.pop_to_base();
        assert_eq!(states.current(), TurnState::PlayersTurn);

        states.reset(TurnState::EnemyTurn);
        assert_eq!(states.depth(), 1);
        assert_eq!(states.current(), TurnState::EnemyTurn);
    }

    #[test]
    fn test_modal_states() {
        assert!(TurnState::Targeting.is_modal());
        assert!(TurnState::LevelUp.is_modal());
        assert!(!TurnState::PlayersTurn.is_modal());
        assert!(!TurnState::PlayerDead.is_modal());
    }

    #[test]
    fn test_refresh_visibility_marks_explored() {
        let mut state = GameState::new(small_config(), 4).unwrap();
        let origin = state.player_position().unwrap();
        assert!(!state.map.is_explored(origin));

        state.refresh_visibility().unwrap();
        assert!(state.is_visible(origin));
        assert!(state.map.is_explored(origin));
        assert!(!state.fov_dirty);
    }

    #[test]
    fn test_next_floor() {
        let mut state = GameState::new(small_config(), 77).unwrap();
        state.player_mut().unwrap().fighter.as_mut().unwrap().hp = 5;
        let origin = state.player_position().unwrap();
        let marker = state.add_entity(Entity::new(
            origin,
            '?',
            Rgb::WHITE,
            "Marker",
            false,
            crate::RenderOrder::Item,
        ));
        assert!(state.entities.contains(marker));

        state.next_floor().unwrap();

        // Nothing from the old floor comes along
        assert!(state.entities.iter().all(|(_, e)| e.name != "Marker"));

        assert_eq!(state.map.depth, 2);
        let player = state.player().unwrap();
        assert_eq!(player.fighter.as_ref().unwrap().hp, 5 + 30 / 2);
        assert_eq!(player.name, "Player");
        assert!(state.fov_dirty);
        assert_eq!(state.player_id, EntityId(0));
        assert!(!state.map.is_blocked(player.position));
        assert!(state
            .entities
            .iter()
            .any(|(_, e)| e.stairs.map(|s| s.floor) == Some(3)));
        assert_eq!(
            state.message_log.last().map(|m| m.color),
            Some(Rgb::LIGHT_VIOLET)
        );
    }

    #[test]
    fn test_new_with_map_requires_fighter() {
        let map = GameMap::new(10, 10, 1).unwrap();
        let not_a_player = Entity::new(
            Position::new(1, 1),
            '@',
            Rgb::WHITE,
            "Ghost",
            true,
            crate::RenderOrder::Actor,
        );
        assert!(matches!(
            GameState::new_with_map(GameConfig::default(), map.clone(), not_a_player, 1),
            Err(DelverError::Configuration(_))
        ));

        let player = Entity::player(Position::new(1, 1), &PlayerConfig::default());
        let state = GameState::new_with_map(GameConfig::default(), map, player, 1).unwrap();
        assert_eq!(state.entities.len(), 1);
    }
}
