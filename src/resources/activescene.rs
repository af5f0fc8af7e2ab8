use bevy_ecs::prelude::Resource;

use crate::scene::graph::Scene;

/// The scene the frame schedule updates.
#[derive(Resource, Debug, Default)]
pub struct ActiveScene(pub Scene);

impl std::ops::Deref for ActiveScene {
    type Target = Scene;

    fn deref(&self) -> &Scene {
        &self.0
    }
}

impl std::ops::DerefMut for ActiveScene {
    fn deref_mut(&mut self) -> &mut Scene {
        &mut self.0
    }
}
