//! Fluent narration builder shared by stories and scripts.

use super::scene::Scene;
use crate::screen::ScreenDescriptor;

/// Builder surface for declaring navigation steps.
///
/// ```ignore
/// let story = Story::new()
///     .root(main)
///     .select(photos_tab)
///     .push(detail)
///     .segue(Scene::present(login).unless(signed_in));
/// ```
pub trait Narratable: Sized {
    /// Append an already-built scene.
    fn segue(self, scene: Scene) -> Self;

    fn root(self, screen: ScreenDescriptor) -> Self {
        self.segue(Scene::root(screen))
    }

    fn select(self, screen: ScreenDescriptor) -> Self {
        self.segue(Scene::select(screen))
    }

    fn set(self, screen: ScreenDescriptor) -> Self {
        self.segue(Scene::set(screen))
    }

    fn embed(self, screen: ScreenDescriptor, container: ScreenDescriptor) -> Self {
        self.segue(Scene::embed(screen, container))
    }

    fn push(self, screen: ScreenDescriptor) -> Self {
        self.segue(Scene::push(screen))
    }

    fn pop(self) -> Self {
        self.segue(Scene::pop())
    }

    fn pop_to(self, screen: ScreenDescriptor) -> Self {
        self.segue(Scene::pop_to(screen))
    }

    fn pop_to_root(self) -> Self {
        self.segue(Scene::pop_to_root())
    }

    fn present(self, screen: ScreenDescriptor) -> Self {
        self.segue(Scene::present(screen))
    }

    fn present_from(self, screen: ScreenDescriptor, presenting: ScreenDescriptor) -> Self {
        self.segue(Scene::present(screen).from(presenting))
    }

    fn dismiss(self) -> Self {
        self.segue(Scene::dismiss())
    }

    fn dismiss_from(self, screen: ScreenDescriptor) -> Self {
        self.segue(Scene::dismiss_from(screen))
    }

    fn unwind(self, screen: ScreenDescriptor) -> Self {
        self.segue(Scene::unwind(screen))
    }
}
