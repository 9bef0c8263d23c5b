use crate::foundation::config::AlgonimOpts;
use crate::foundation::error::{AlgonimError, AlgonimResult};
use crate::gfx::drawer::Drawer;
use crate::gfx::region::Region;
use crate::models::code::Code;
use crate::models::graph::Graph;
use crate::models::tree::Tree;
use crate::models::{Model, ModelId, ModelRegistry, ModelStore};
use crate::pane::layout::{Layout, layout_to_pane};
use crate::pane::pane::Pane;
use crate::render::surface::Surface;

/// The host: owns the models, the model registry and the pane tree built from the current
/// layout.
#[derive(Debug)]
pub struct Algonim {
    opts: AlgonimOpts,
    registry: ModelRegistry,
    models: ModelStore,
    root: Option<Pane>,
}

impl Default for Algonim {
    fn default() -> Self {
        Self::new(AlgonimOpts::default())
    }
}

impl Algonim {
    pub fn new(opts: AlgonimOpts) -> Self {
        Self::with_registry(opts, ModelRegistry::default())
    }

    pub fn with_registry(opts: AlgonimOpts, registry: ModelRegistry) -> Self {
        Self {
            opts,
            registry,
            models: ModelStore::new(),
            root: None,
        }
    }

    pub fn opts(&self) -> &AlgonimOpts {
        &self.opts
    }

    pub fn opts_mut(&mut self) -> &mut AlgonimOpts {
        &mut self.opts
    }

    pub fn registry_mut(&mut self) -> &mut ModelRegistry {
        &mut self.registry
    }

    pub fn models(&self) -> &ModelStore {
        &self.models
    }

    /// Constructs a model of a registered `kind` (`"code"`, `"graph"`, `"tree"`, ...).
    pub fn create_model(&mut self, kind: &str) -> AlgonimResult<ModelId> {
        let model = self.registry.create(kind, &self.opts)?;
        let id = self.models.insert(model);
        tracing::debug!(kind, id = id.index(), "created model");
        Ok(id)
    }

    pub fn insert_model(&mut self, model: impl Into<Model>) -> ModelId {
        self.models.insert(model.into())
    }

    pub fn model(&self, id: ModelId) -> AlgonimResult<&Model> {
        self.models.get(id)
    }

    pub fn model_mut(&mut self, id: ModelId) -> AlgonimResult<&mut Model> {
        self.models.get_mut(id)
    }

    pub fn code(&self, id: ModelId) -> AlgonimResult<&Code> {
        match self.models.get(id)? {
            Model::Code(m) => Ok(m),
            other => Err(wrong_kind(id, other, "code")),
        }
    }

    pub fn code_mut(&mut self, id: ModelId) -> AlgonimResult<&mut Code> {
        match self.models.get_mut(id)? {
            Model::Code(m) => Ok(m),
            other => Err(wrong_kind(id, other, "code")),
        }
    }

    pub fn graph(&self, id: ModelId) -> AlgonimResult<&Graph> {
        match self.models.get(id)? {
            Model::Graph(m) => Ok(m),
            other => Err(wrong_kind(id, other, "graph")),
        }
    }

    pub fn graph_mut(&mut self, id: ModelId) -> AlgonimResult<&mut Graph> {
        match self.models.get_mut(id)? {
            Model::Graph(m) => Ok(m),
            other => Err(wrong_kind(id, other, "graph")),
        }
    }

    pub fn tree(&self, id: ModelId) -> AlgonimResult<&Tree> {
        match self.models.get(id)? {
            Model::Tree(m) => Ok(m),
            other => Err(wrong_kind(id, other, "tree")),
        }
    }

    pub fn tree_mut(&mut self, id: ModelId) -> AlgonimResult<&mut Tree> {
        match self.models.get_mut(id)? {
            Model::Tree(m) => Ok(m),
            other => Err(wrong_kind(id, other, "tree")),
        }
    }

    pub fn root_pane(&self) -> Option<&Pane> {
        self.root.as_ref()
    }

    /// Replaces the pane tree. On error the previous tree stays in place.
    #[tracing::instrument(level = "debug", skip(self, layout))]
    pub fn set_layout(&mut self, layout: &Layout) -> AlgonimResult<()> {
        for id in layout.model_ids() {
            if !self.models.contains(id) {
                return Err(AlgonimError::invalid_handle(format!(
                    "layout references model {} which does not exist",
                    id.index()
                )));
            }
        }
        let pane = layout_to_pane(layout, self.opts.depth_limit)?;
        self.root = Some(pane);
        Ok(())
    }

    pub fn clear_layout(&mut self) {
        self.root = None;
    }

    /// Draws the current pane tree over the whole surface and hands back the root drawer.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn redraw<'s, S: Surface>(&self, surface: &'s mut S) -> AlgonimResult<Drawer<'s>> {
        let region = Region::new(0.0, 0.0, f64::from(surface.width()), f64::from(surface.height()));
        let ctx = surface.context_2d().ok_or_else(|| {
            AlgonimError::surface_unavailable("surface did not provide a 2d drawing context")
        })?;

        let mut drawer = Drawer::new(ctx, region);
        drawer.fill(self.opts.background);
        if let Some(root) = &self.root {
            root.draw(&mut drawer, &self.models);
        }
        Ok(drawer)
    }

    /// [`Algonim::redraw`] followed by [`Surface::capture`].
    pub fn render_frame<S: Surface>(&self, surface: &mut S) -> AlgonimResult<S::Frame> {
        self.redraw(&mut *surface)?;
        surface.capture()
    }

    /// Where each model pane lands on a `width` x `height` surface.
    pub fn pane_regions(&self, width: u32, height: u32) -> Vec<(Option<ModelId>, Region)> {
        let region = Region::new(0.0, 0.0, f64::from(width), f64::from(height));
        self.root
            .as_ref()
            .map(|root| root.model_regions(region))
            .unwrap_or_default()
    }
}

fn wrong_kind(id: ModelId, model: &Model, wanted: &str) -> AlgonimError {
    AlgonimError::validation(format!(
        "model {} is a {} model, not {wanted}",
        id.index(),
        model.kind()
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/widget/algonim.rs"]
mod tests;
