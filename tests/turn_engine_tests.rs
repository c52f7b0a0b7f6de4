//! Turn engine scenarios driven through `GameState::handle_intent` on a
//! hand-built open room.

use delver::{
    stairs_down, Ai, ClickKind, EngineSignal, Entity, EntityId, Fighter, GameConfig, GameMap,
    GameState, Intent, ItemTable, LevelUpChoice, MessageLogConfig, Position, RenderOrder, Rgb,
    TurnState,
};

fn test_config() -> GameConfig {
    GameConfig {
        messages: MessageLogConfig {
            width: 80,
            height: 100,
        },
        ..GameConfig::default()
    }
}

/// A 20x12 floor with every interior cell open, and the player at `start`.
fn open_room(start: Position) -> GameState {
    let config = test_config();
    let mut map = GameMap::new(20, 12, 1).unwrap();
    for y in 1..11 {
        for x in 1..19 {
            map.carve(Position::new(x, y));
        }
    }
    let player = Entity::player(start, &config.player);
    GameState::new_with_map(config, map, player, 99).unwrap()
}

fn monster(name: &str, pos: Position, fighter: Fighter) -> Entity {
    Entity::new(pos, 'o', Rgb::DESATURATED_GREEN, name, true, RenderOrder::Actor)
        .with_fighter(fighter)
        .with_ai(Ai::Basic)
}

fn item(name: &str, pos: Position) -> Entity {
    ItemTable::default().find(name).unwrap().spawn(pos)
}

fn give(state: &mut GameState, entity: Entity) {
    state
        .player_mut()
        .unwrap()
        .inventory
        .as_mut()
        .unwrap()
        .add_item(entity)
        .unwrap();
}

fn log_texts(state: &GameState) -> Vec<String> {
    state.message_log.iter().map(|m| m.text.clone()).collect()
}

fn logged(state: &GameState, text: &str) -> bool {
    log_texts(state).iter().any(|line| line == text)
}

fn player_hp(state: &GameState) -> i32 {
    state.player().unwrap().fighter.as_ref().unwrap().hp
}

fn fighter_of(state: &GameState, id: EntityId) -> Option<Fighter> {
    state.entities.get(id).unwrap().fighter.clone()
}

#[test]
fn test_bump_attack_and_counterattack() {
    let mut state = open_room(Position::new(5, 5));
    let orc = state.add_entity(monster("Orc", Position::new(6, 5), Fighter::new(10, 0, 3, 35)));

    let signal = state.handle_intent(Intent::step(1, 0)).unwrap();

    assert_eq!(signal, EngineSignal::Continue);
    assert_eq!(fighter_of(&state, orc).unwrap().hp, 5);
    assert!(logged(&state, "Player attacks Orc for 5 hit points."));
    assert!(logged(&state, "Orc attacks Player for 1 hit points."));
    assert_eq!(player_hp(&state), 29);
    assert_eq!(state.player_position().unwrap(), Position::new(5, 5));
    assert_eq!(state.current_state(), TurnState::PlayersTurn);
    assert_eq!(state.turn_number, 1);
}

#[test]
fn test_kill_turns_monster_into_corpse_and_grants_xp() {
    let mut state = open_room(Position::new(5, 5));
    let orc = state.add_entity(monster("Orc", Position::new(6, 5), Fighter::new(5, 0, 3, 35)));

    state.handle_intent(Intent::step(1, 0)).unwrap();

    let corpse = state.entities.get(orc).unwrap();
    assert_eq!(corpse.name, "remains of Orc");
    assert_eq!(corpse.glyph, '%');
    assert!(!corpse.blocks_movement);
    assert!(corpse.fighter.is_none());
    assert!(corpse.ai.is_none());
    assert_eq!(corpse.render_order, RenderOrder::Corpse);

    let texts = log_texts(&state);
    let dead = texts.iter().position(|t| t == "Orc is dead!").unwrap();
    let xp = texts
        .iter()
        .position(|t| t == "You gain 35 experience points.")
        .unwrap();
    assert!(dead < xp);
    assert_eq!(state.player().unwrap().level.as_ref().unwrap().current_xp, 35);

    // The corpse no longer blocks
    state.handle_intent(Intent::step(1, 0)).unwrap();
    assert_eq!(state.player_position().unwrap(), Position::new(6, 5));
}

#[test]
fn test_level_up_defers_enemy_phase_until_choice() {
    let mut state = open_room(Position::new(5, 5));
    state.add_entity(monster("Orc", Position::new(6, 5), Fighter::new(5, 0, 3, 400)));
    state.add_entity(monster("Troll", Position::new(4, 5), Fighter::new(16, 1, 4, 100)));

    state.handle_intent(Intent::step(1, 0)).unwrap();

    assert_eq!(state.current_state(), TurnState::LevelUp);
    assert!(logged(&state, "Your battle skills grow stronger! You reached level 2!"));
    assert_eq!(player_hp(&state), 30);
    let level = state.player().unwrap().level.clone().unwrap();
    assert_eq!(level.current_level, 2);
    assert_eq!(level.current_xp, 50);

    // Movement is ignored while the menu is open
    state.handle_intent(Intent::step(0, 1)).unwrap();
    assert_eq!(state.player_position().unwrap(), Position::new(5, 5));

    state
        .handle_intent(Intent::LevelUp(LevelUpChoice::Constitution))
        .unwrap();

    let fighter = state.player().unwrap().fighter.clone().unwrap();
    assert_eq!(fighter.max_hp, 50);
    // Troll hits for 4 - 2 once the enemy phase runs
    assert_eq!(fighter.hp, 48);
    assert_eq!(state.current_state(), TurnState::PlayersTurn);
    assert_eq!(state.turn_number, 1);
}

#[test]
fn test_strength_and_agility_choices() {
    let mut state = open_room(Position::new(5, 5));
    state.states.push(TurnState::LevelUp);
    state.handle_intent(Intent::LevelUp(LevelUpChoice::Strength)).unwrap();
    assert_eq!(state.player().unwrap().fighter.as_ref().unwrap().power, 6);

    state.states.push(TurnState::LevelUp);
    state.handle_intent(Intent::LevelUp(LevelUpChoice::Agility)).unwrap();
    assert_eq!(state.player().unwrap().fighter.as_ref().unwrap().defense, 3);
}

#[test]
fn test_walls_block_without_using_the_turn() {
    let mut state = open_room(Position::new(1, 1));
    state.handle_intent(Intent::step(-1, 0)).unwrap();
    assert_eq!(state.player_position().unwrap(), Position::new(1, 1));
    assert_eq!(state.turn_number, 0);

    state.handle_intent(Intent::step(1, 1)).unwrap();
    assert_eq!(state.player_position().unwrap(), Position::new(2, 2));
    assert_eq!(state.turn_number, 1);
}

#[test]
fn test_pickup() {
    let mut state = open_room(Position::new(5, 5));
    state.handle_intent(Intent::Pickup).unwrap();
    assert!(logged(&state, "There is nothing here to pick up."));
    assert_eq!(state.turn_number, 0);

    let potion = state.add_entity(item("Healing Potion", Position::new(5, 5)));
    state.handle_intent(Intent::Pickup).unwrap();

    assert!(logged(&state, "You pick up the Healing Potion!"));
    assert!(!state.entities.contains(potion));
    assert_eq!(state.player().unwrap().inventory.as_ref().unwrap().len(), 1);
    assert_eq!(state.turn_number, 1);
}

#[test]
fn test_pickup_with_full_inventory_keeps_the_turn() {
    let mut config = test_config();
    config.player.inventory_capacity = 1;
    let mut map = GameMap::new(10, 10, 1).unwrap();
    for y in 1..9 {
        for x in 1..9 {
            map.carve(Position::new(x, y));
        }
    }
    let player = Entity::player(Position::new(3, 3), &config.player);
    let mut state = GameState::new_with_map(config, map, player, 1).unwrap();
    give(&mut state, item("Lightning Scroll", Position::new(3, 3)));
    let potion = state.add_entity(item("Healing Potion", Position::new(3, 3)));

    state.handle_intent(Intent::Pickup).unwrap();

    assert!(logged(&state, "You cannot carry any more, your inventory is full"));
    assert!(state.entities.contains(potion));
    assert_eq!(state.current_state(), TurnState::PlayersTurn);
    assert_eq!(state.turn_number, 0);
}

#[test]
fn test_healing_potion_needs_missing_health() {
    let mut state = open_room(Position::new(5, 5));
    give(&mut state, item("Healing Potion", Position::new(5, 5)));

    state.handle_intent(Intent::ShowInventory).unwrap();
    assert_eq!(state.current_state(), TurnState::ShowInventory);
    state.handle_intent(Intent::InventoryIndex(0)).unwrap();

    assert!(logged(&state, "You are already at full health"));
    assert_eq!(state.player().unwrap().inventory.as_ref().unwrap().len(), 1);
    assert_eq!(state.turn_number, 0);

    state.player_mut().unwrap().fighter.as_mut().unwrap().hp = 20;
    state.handle_intent(Intent::InventoryIndex(0)).unwrap();

    assert!(logged(&state, "Your wounds start to feel better!"));
    assert_eq!(player_hp(&state), 24);
    assert!(state.player().unwrap().inventory.as_ref().unwrap().is_empty());
    assert_eq!(state.current_state(), TurnState::PlayersTurn);
    assert_eq!(state.turn_number, 1);
}

#[test]
fn test_out_of_range_inventory_index_is_ignored() {
    let mut state = open_room(Position::new(5, 5));
    state.handle_intent(Intent::ShowInventory).unwrap();
    state.handle_intent(Intent::InventoryIndex(4)).unwrap();
    assert_eq!(state.current_state(), TurnState::ShowInventory);
    assert_eq!(state.turn_number, 0);
}

#[test]
fn test_drop_item() {
    let mut state = open_room(Position::new(5, 5));
    give(&mut state, item("Healing Potion", Position::new(1, 1)));

    state.handle_intent(Intent::DropInventory).unwrap();
    state.handle_intent(Intent::InventoryIndex(0)).unwrap();

    assert!(logged(&state, "You dropped the Healing Potion."));
    assert!(state.player().unwrap().inventory.as_ref().unwrap().is_empty());
    let dropped = state
        .entities
        .iter()
        .find(|(_, e)| e.name == "Healing Potion")
        .map(|(_, e)| e.position);
    assert_eq!(dropped, Some(Position::new(5, 5)));
    assert_eq!(state.turn_number, 1);
}

#[test]
fn test_targeting_cancel_restores_players_turn() {
    let mut state = open_room(Position::new(5, 5));
    give(&mut state, item("Fireball Scroll", Position::new(5, 5)));

    state.handle_intent(Intent::ShowInventory).unwrap();
    state.handle_intent(Intent::InventoryIndex(0)).unwrap();

    assert_eq!(state.current_state(), TurnState::Targeting);
    assert_eq!(state.targeting_item, Some(0));
    assert!(logged(
        &state,
        "Left-click a target tile for the fireball, or right-click to cancel."
    ));

    state
        .handle_intent(Intent::TargetingClick {
            kind: ClickKind::Right,
            position: Position::new(7, 7),
        })
        .unwrap();

    assert_eq!(state.current_state(), TurnState::PlayersTurn);
    assert_eq!(state.targeting_item, None);
    assert!(logged(&state, "Targeting cancelled"));
    assert_eq!(state.player().unwrap().inventory.as_ref().unwrap().len(), 1);
    assert_eq!(state.turn_number, 0);
}

#[test]
fn test_escape_cancels_targeting() {
    let mut state = open_room(Position::new(5, 5));
    give(&mut state, item("Confusion Scroll", Position::new(5, 5)));
    state.handle_intent(Intent::ShowInventory).unwrap();
    state.handle_intent(Intent::InventoryIndex(0)).unwrap();

    let signal = state.handle_intent(Intent::Exit).unwrap();

    assert_eq!(signal, EngineSignal::Continue);
    assert_eq!(state.current_state(), TurnState::PlayersTurn);
    assert_eq!(state.player().unwrap().inventory.as_ref().unwrap().len(), 1);
}

#[test]
fn test_fireball_on_target_consumes_scroll() {
    let mut state = open_room(Position::new(5, 5));
    give(&mut state, item("Fireball Scroll", Position::new(5, 5)));
    let orc = state.add_entity(monster("Orc", Position::new(9, 5), Fighter::new(10, 0, 3, 35)));

    state.handle_intent(Intent::ShowInventory).unwrap();
    state.handle_intent(Intent::InventoryIndex(0)).unwrap();
    state
        .handle_intent(Intent::TargetingClick {
            kind: ClickKind::Left,
            position: Position::new(9, 5),
        })
        .unwrap();

    assert!(logged(&state, "The Orc gets burned for 12 hit points."));
    assert!(logged(&state, "Orc is dead!"));
    assert!(fighter_of(&state, orc).is_none());
    assert_eq!(player_hp(&state), 30);
    assert!(state.player().unwrap().inventory.as_ref().unwrap().is_empty());
    assert_eq!(state.current_state(), TurnState::PlayersTurn);
    assert_eq!(state.turn_number, 1);
}

#[test]
fn test_confusion_scroll_on_empty_tile_keeps_targeting() {
    let mut state = open_room(Position::new(5, 5));
    give(&mut state, item("Confusion Scroll", Position::new(5, 5)));
    state.handle_intent(Intent::ShowInventory).unwrap();
    state.handle_intent(Intent::InventoryIndex(0)).unwrap();

    state
        .handle_intent(Intent::TargetingClick {
            kind: ClickKind::Left,
            position: Position::new(7, 7),
        })
        .unwrap();

    assert!(logged(&state, "There is no targetable enemy at that location."));
    assert_eq!(state.current_state(), TurnState::Targeting);
    assert_eq!(state.player().unwrap().inventory.as_ref().unwrap().len(), 1);
    assert_eq!(state.turn_number, 0);
}

#[test]
fn test_exit_signals() {
    let mut state = open_room(Position::new(5, 5));
    assert_eq!(
        state.handle_intent(Intent::Exit).unwrap(),
        EngineSignal::ExitRequested
    );

    state.handle_intent(Intent::ShowInventory).unwrap();
    assert_eq!(
        state.handle_intent(Intent::Exit).unwrap(),
        EngineSignal::Continue
    );
    assert_eq!(state.current_state(), TurnState::PlayersTurn);

    assert_eq!(
        state.handle_intent(Intent::ToggleFullscreen).unwrap(),
        EngineSignal::ToggleFullscreen
    );
}

#[test]
fn test_enemy_phase_stops_when_player_dies() {
    let mut state = open_room(Position::new(5, 5));
    state.player_mut().unwrap().fighter.as_mut().unwrap().hp = 1;
    let first = state.add_entity(monster("Goblin", Position::new(6, 5), Fighter::new(100, 0, 3, 10)));
    let second = state.add_entity(monster("Orc", Position::new(4, 5), Fighter::new(10, 0, 3, 35)));
    assert!(first < second);

    state.handle_intent(Intent::step(1, 0)).unwrap();

    assert!(logged(&state, "Goblin attacks Player for 1 hit points."));
    assert!(logged(&state, "You died!"));
    assert!(!log_texts(&state).iter().any(|t| t.starts_with("Orc attacks")));
    assert_eq!(state.current_state(), TurnState::PlayerDead);
    assert_eq!(state.player().unwrap().glyph, '%');
    assert_eq!(state.turn_number, 0);

    // Nothing but leaving works after death
    state.handle_intent(Intent::step(0, 1)).unwrap();
    assert_eq!(state.player_position().unwrap(), Position::new(5, 5));
    assert_eq!(
        state.handle_intent(Intent::Exit).unwrap(),
        EngineSignal::ExitRequested
    );
}

#[test]
fn test_monsters_out_of_sight_stay_put() {
    let mut state = open_room(Position::new(2, 2));
    // Blocked from view by a wall column
    for y in 1..11 {
        state.map.get_tile_mut(Position::new(10, y)).unwrap().blocked = true;
        state.map.get_tile_mut(Position::new(10, y)).unwrap().block_sight = true;
    }
    let orc = state.add_entity(monster("Orc", Position::new(15, 5), Fighter::new(10, 0, 3, 35)));
    state.mark_fov_dirty();

    state.handle_intent(Intent::step(1, 0)).unwrap();

    assert_eq!(state.entities.get(orc).unwrap().position, Position::new(15, 5));
    assert_eq!(state.turn_number, 1);
}

#[test]
fn test_stairs() {
    let mut state = open_room(Position::new(5, 5));
    state.handle_intent(Intent::TakeStairs).unwrap();
    assert!(logged(&state, "There are no stairs here."));
    assert_eq!(state.map.depth, 1);

    state.add_entity(stairs_down(Position::new(5, 5), 1));
    state.add_entity(monster("Marker", Position::new(12, 8), Fighter::new(10, 0, 3, 35)));
    state.player_mut().unwrap().fighter.as_mut().unwrap().hp = 4;
    state.handle_intent(Intent::TakeStairs).unwrap();

    assert!(state.entities.iter().all(|(_, e)| e.name != "Marker"));

    assert_eq!(state.map.depth, 2);
    assert_eq!(player_hp(&state), 19);
    assert_eq!(state.player_id, EntityId(0));
    assert!(logged(&state, "You take a moment to rest, and recover your strength."));
    // The log survives the trip
    assert!(logged(&state, "There are no stairs here."));
    assert!(!state.map.is_blocked(state.player_position().unwrap()));
}
