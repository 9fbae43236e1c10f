//! Randomized create/destroy/refresh/add/remove sequences checked against
//! a simple model after every step

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::ecs::{
    Component, ComponentSet, EcsError, Entity, EntityState, System, SystemId, World,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Alpha(u32);
impl Component for Alpha {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Beta;
impl Component for Beta {}

struct Probe<R>(PhantomData<fn() -> R>);

impl<R> Probe<R> {
    fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R: ComponentSet> System for Probe<R> {
    type Required = R;
}

#[derive(Debug, Default, Clone, Copy)]
struct Expected {
    alpha: bool,
    beta: bool,
    pending: bool,
}

fn check_interest<R: ComponentSet>(world: &World, id: SystemId<Probe<R>>, candidates: &[Entity]) {
    let required = R::mask().unwrap();
    let tracked = world.system_entities(id);

    for &entity in candidates {
        let matches = world.component_mask(entity).unwrap().satisfies(required);
        assert_eq!(
            tracked.contains(&entity),
            matches,
            "entity {entity} membership in {:?}",
            id
        );
    }
    for entity in tracked {
        assert!(candidates.contains(entity), "{entity} tracked after reclamation");
    }
    let unique: HashSet<_> = tracked.iter().collect();
    assert_eq!(unique.len(), tracked.len(), "duplicate entries in {:?}", id);
}

#[test]
fn test_random_lifecycle_preserves_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut world = World::with_capacity(48);

    let alpha_only = world.register_system(Probe::<(Alpha,)>::new()).unwrap();
    let beta_only = world.register_system(Probe::<(Beta,)>::new()).unwrap();
    let both = world.register_system(Probe::<(Alpha, Beta)>::new()).unwrap();
    let everything = world.register_system(Probe::<()>::new()).unwrap();

    let mut model: HashMap<Entity, Expected> = HashMap::new();
    let mut reclaimed: Vec<Entity> = Vec::new();

    for step in 0..2_000u32 {
        let handles: Vec<Entity> = model.keys().copied().collect();
        let pick = |rng: &mut StdRng| handles[rng.gen_range(0..handles.len())];

        match rng.gen_range(0..10) {
            0..=2 => match world.create_entity() {
                Ok(entity) => {
                    assert!(!model.contains_key(&entity));
                    assert_eq!(world.component_mask(entity).unwrap().bits(), 0);
                    model.insert(entity, Expected::default());
                }
                Err(err) => {
                    assert_eq!(err, EcsError::CapacityExhausted { capacity: 48 });
                    assert_eq!(model.len(), 48);
                }
            },
            3 if !handles.is_empty() => {
                let entity = pick(&mut rng);
                world.destroy_entity(entity);
                if rng.gen_bool(0.5) {
                    world.destroy_entity(entity);
                }
                if let Some(expected) = model.get_mut(&entity) {
                    expected.pending = true;
                }
            }
            4 => {
                let pending: Vec<Entity> = model
                    .iter()
                    .filter(|(_, expected)| expected.pending)
                    .map(|(entity, _)| *entity)
                    .collect();
                assert_eq!(world.refresh(), pending.len());
                for entity in pending {
                    model.remove(&entity);
                    reclaimed.push(entity);
                }
            }
            5 | 6 if !handles.is_empty() => {
                let entity = pick(&mut rng);
                let expected = model[&entity];
                let result = world.add_component(entity, Alpha(step)).map(|alpha| alpha.0);
                if expected.pending {
                    assert_eq!(result, Err(EcsError::StaleEntity(entity)));
                } else {
                    assert_eq!(result, Ok(step));
                    model.get_mut(&entity).unwrap().alpha = true;
                }
            }
            7 if !handles.is_empty() => {
                let entity = pick(&mut rng);
                let expected = model[&entity];
                if !expected.pending {
                    world.add_component(entity, Beta).unwrap();
                    model.get_mut(&entity).unwrap().beta = true;
                }
            }
            8 if !handles.is_empty() => {
                let entity = pick(&mut rng);
                let removed = world.remove_component::<Alpha>(entity).unwrap();
                assert_eq!(removed.is_some(), model[&entity].alpha);
                model.get_mut(&entity).unwrap().alpha = false;
            }
            9 if !handles.is_empty() => {
                let entity = pick(&mut rng);
                let removed = world.remove_component::<Beta>(entity).unwrap();
                assert_eq!(removed.is_some(), model[&entity].beta);
                model.get_mut(&entity).unwrap().beta = false;
            }
            _ => {}
        }

        // No two live entities share an identifier
        let indices: HashSet<u32> = model.keys().map(Entity::index).collect();
        assert_eq!(indices.len(), model.len());
        assert_eq!(world.living_count(), model.len());

        for (entity, expected) in &model {
            let state = if expected.pending {
                EntityState::PendingDestroy
            } else {
                EntityState::Active
            };
            assert_eq!(world.entity_state(*entity), Some(state));
            assert_eq!(world.has_component::<Alpha>(*entity), expected.alpha);
            assert_eq!(world.has_component::<Beta>(*entity), expected.beta);
        }
        for entity in &reclaimed {
            assert_eq!(world.entity_state(*entity), None);
            assert!(!world.has_component::<Alpha>(*entity));
            assert_eq!(
                world.get_component::<Beta>(*entity),
                Err(EcsError::StaleEntity(*entity))
            );
        }

        let candidates: Vec<Entity> = model.keys().copied().collect();
        check_interest(&world, alpha_only, &candidates);
        check_interest(&world, beta_only, &candidates);
        check_interest(&world, both, &candidates);
        check_interest(&world, everything, &candidates);
    }

    // Reclaimed slots come back empty
    world.refresh();
    let alive: Vec<Entity> = world.entities().collect();
    for entity in alive {
        world.destroy_entity(entity);
    }
    world.refresh();
    assert_eq!(world.living_count(), 0);
    assert_eq!(world.query::<Alpha>().count(), 0);
    assert_eq!(world.query::<Beta>().count(), 0);
}

#[test]
fn test_double_destroy_matches_single_destroy() {
    let mut once = World::with_capacity(4);
    let mut twice = World::with_capacity(4);

    for world in [&mut once, &mut twice] {
        let keep = world.create_entity().unwrap();
        world.add_component(keep, Beta).unwrap();
        let doomed = world.create_entity().unwrap();
        world.add_component(doomed, Alpha(1)).unwrap();
    }

    let doomed = once.entity(1).unwrap();
    once.destroy_entity(doomed);
    let doomed = twice.entity(1).unwrap();
    twice.destroy_entity(doomed);
    twice.destroy_entity(doomed);

    assert_eq!(once.refresh(), twice.refresh());
    assert_eq!(once.living_count(), twice.living_count());
    let next_once = once.create_entity().unwrap();
    let next_twice = twice.create_entity().unwrap();
    assert_eq!(next_once, next_twice);
}

#[test]
fn test_destroy_stale_handle_is_noop() {
    let mut world = World::with_capacity(2);
    let first = world.create_entity().unwrap();
    world.destroy_entity(first);
    world.refresh();

    let reused = loop {
        let entity = world.create_entity().unwrap();
        if entity.index() == first.index() {
            break entity;
        }
    };
    world.destroy_entity(first);
    assert_eq!(world.entity_state(reused), Some(EntityState::Active));
    assert_eq!(world.refresh(), 0);
}
