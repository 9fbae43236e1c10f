//! Parent/child links and world-matrix resolution
//!
//! Links live on the entity slots, not on `TransformComponent`, so entities
//! without a transform can still group others. World matrices are resolved
//! lazily: each transform caches its last result stamped with its local
//! revision and its parent's stamp, and a fresh stamp is drawn whenever the
//! matrix is recomputed. A change anywhere up the chain therefore reaches
//! every descendant on its next read.

use super::components::TransformComponent;
use super::{EcsError, EcsResult, Entity, World};
use crate::foundation::math::Mat4;

impl World {
    /// Re-parent `child` (or detach it with `None`)
    ///
    /// Fails if either handle is stale or if `parent` is `child` or one of its
    /// descendants. The child's transform is marked dirty.
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> EcsResult<()> {
        let old_parent = self
            .entities
            .get(child)
            .ok_or(EcsError::StaleEntity(child))?
            .parent;

        if let Some(parent) = parent {
            if self.entities.get(parent).is_none() {
                return Err(EcsError::StaleEntity(parent));
            }
            let mut ancestor = Some(parent);
            while let Some(current) = ancestor {
                if current == child {
                    return Err(EcsError::HierarchyCycle { child, parent });
                }
                ancestor = self.parent(current);
            }
        }

        if old_parent == parent {
            return Ok(());
        }

        if let Some(old) = old_parent {
            if let Some(slot) = self.entities.get_mut(old) {
                slot.children.retain(|c| *c != child);
            }
        }
        if let Some(new) = parent {
            if let Some(slot) = self.entities.get_mut(new) {
                slot.children.push(child);
            }
        }
        if let Some(slot) = self.entities.get_mut(child) {
            slot.parent = parent;
        }

        if let Ok(transform) = self.get_component_mut::<TransformComponent>(child) {
            transform.mark_dirty();
        }
        log::trace!("Parent of {} set to {:?}", child, parent);
        Ok(())
    }

    /// Parent of an entity, if any
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.entities.get(entity)?.parent
    }

    /// Direct children of an entity, in attachment order
    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.entities
            .get(entity)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    /// Local TRS matrix of an entity's transform
    pub fn local_matrix(&self, entity: Entity) -> EcsResult<Mat4> {
        Ok(self.get_component::<TransformComponent>(entity)?.local_matrix())
    }

    /// World matrix: the local matrix left-multiplied by the parent's world
    /// matrix when the parent has a transform
    ///
    /// Recomputes only if the transform or one of its ancestors changed since
    /// the last read.
    pub fn world_matrix(&mut self, entity: Entity) -> EcsResult<Mat4> {
        self.resolve_world_matrix(entity).map(|(matrix, _)| matrix)
    }

    /// World matrix together with the stamp identifying this computation
    ///
    /// Walks up to the first ancestor without a transform, then resolves
    /// top-down so deep chains do not grow the call stack.
    pub(crate) fn resolve_world_matrix(&mut self, entity: Entity) -> EcsResult<(Mat4, u64)> {
        // Fail on the requested entity before walking its ancestors
        self.get_component::<TransformComponent>(entity)?;

        let mut chain = vec![entity];
        let mut current = entity;
        while let Some(parent) = self
            .parent(current)
            .filter(|parent| self.has_component::<TransformComponent>(*parent))
        {
            chain.push(parent);
            current = parent;
        }

        let mut parent_world: Option<(Mat4, u64)> = None;
        for &node in chain.iter().rev() {
            let parent_stamp = parent_world.map(|(_, stamp)| stamp);
            let transform = self.get_component::<TransformComponent>(node)?;
            if let Some(cached) = transform.cached_world(parent_stamp) {
                parent_world = Some(cached);
                continue;
            }

            let local = transform.local_matrix();
            let matrix = match parent_world {
                Some((parent_matrix, _)) => parent_matrix * local,
                None => local,
            };
            let stamp = self.next_stamp();
            self.get_component_mut::<TransformComponent>(node)?
                .store_world(matrix, parent_stamp, stamp);
            parent_world = Some((matrix, stamp));
        }

        parent_world.ok_or_else(|| EcsError::MissingComponent {
            entity,
            component: std::any::type_name::<TransformComponent>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use approx::assert_relative_eq;

    fn spawn(world: &mut World, position: Vec3) -> Entity {
        let entity = world.create_entity().unwrap();
        world
            .add_component(entity, TransformComponent::from_position(position))
            .unwrap();
        entity
    }

    #[test]
    fn test_set_parent_links_both_sides() {
        let mut world = World::new();
        let root = spawn(&mut world, Vec3::zeros());
        let child = spawn(&mut world, Vec3::zeros());

        world.set_parent(child, Some(root)).unwrap();
        assert_eq!(world.parent(child), Some(root));
        assert_eq!(world.children(root), &[child]);

        world.set_parent(child, None).unwrap();
        assert_eq!(world.parent(child), None);
        assert!(world.children(root).is_empty());
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut world = World::new();
        let a = spawn(&mut world, Vec3::zeros());
        let b = spawn(&mut world, Vec3::zeros());
        world.set_parent(b, Some(a)).unwrap();

        assert_eq!(
            world.set_parent(a, Some(b)),
            Err(EcsError::HierarchyCycle { child: a, parent: b })
        );
        assert_eq!(
            world.set_parent(a, Some(a)),
            Err(EcsError::HierarchyCycle { child: a, parent: a })
        );
    }

    #[test]
    fn test_parent_without_transform_is_ignored() {
        let mut world = World::new();
        let group = world.create_entity().unwrap();
        let child = spawn(&mut world, Vec3::new(1.0, 0.0, 0.0));
        world.set_parent(child, Some(group)).unwrap();

        let matrix = world.world_matrix(child).unwrap();
        assert_relative_eq!(matrix.translation_part(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_reclaiming_parent_orphans_children() {
        let mut world = World::new();
        let root = spawn(&mut world, Vec3::new(5.0, 0.0, 0.0));
        let child = spawn(&mut world, Vec3::new(1.0, 0.0, 0.0));
        world.set_parent(child, Some(root)).unwrap();
        assert_relative_eq!(
            world.world_matrix(child).unwrap().translation_part(),
            Vec3::new(6.0, 0.0, 0.0)
        );

        world.destroy_entity(root);
        world.refresh();

        assert_eq!(world.parent(child), None);
        assert_relative_eq!(
            world.world_matrix(child).unwrap().translation_part(),
            Vec3::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_reclaiming_child_detaches_from_parent() {
        let mut world = World::new();
        let root = spawn(&mut world, Vec3::zeros());
        let child = spawn(&mut world, Vec3::zeros());
        world.set_parent(child, Some(root)).unwrap();

        world.destroy_entity(child);
        world.refresh();
        assert!(world.children(root).is_empty());
    }
}
