//! Cross-module ECS tests: randomized lifecycle properties, transform
//! hierarchy caching, and frame scenarios with recording collaborators

mod lifecycle;
