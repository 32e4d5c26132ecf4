use anyhow::Context as _;
use instant::Duration;
use winit::{
    event::{KeyEvent, WindowEvent},
    keyboard::PhysicalKey,
};

use crate::{
    context::{Context, InitContext},
    data_structures::scene_graph::{ContainerNode, SceneNode},
    flow::{GraphicsFlow, Out},
    render::Render,
    resources::load_model,
    title::Stage,
};

use super::{AnimalController, ControlledAnimal, Exhibit, ZooState};

struct LoadedExhibit {
    name: String,
    root: ContainerNode,
}

struct Controlled {
    exhibit: usize,
    instance: usize,
    controller: AnimalController,
}

/// Draws all exhibits and moves the controlled animal.
pub struct ZooFlow {
    exhibits: Vec<LoadedExhibit>,
    controlled: Option<Controlled>,
}

impl ZooFlow {
    /// Loads every exhibit; any model that fails to load aborts the demo.
    pub async fn new(
        ctx: &InitContext,
        exhibits: Vec<Exhibit>,
        controlled: Option<ControlledAnimal>,
    ) -> anyhow::Result<Self> {
        let controlled = controlled.and_then(|animal| {
            let placement = exhibits
                .get(animal.exhibit)
                .and_then(|exhibit| exhibit.placements.get(animal.instance));
            match placement {
                Some(placement) => Some(Controlled {
                    exhibit: animal.exhibit,
                    instance: animal.instance,
                    controller: AnimalController::new(
                        placement.clone(),
                        animal.speed,
                        animal.turn_speed,
                    ),
                }),
                None => {
                    log::warn!(
                        "No placement {} in exhibit {}, nothing can be moved.",
                        animal.instance,
                        animal.exhibit
                    );
                    None
                }
            }
        });

        let loads = exhibits.iter().map(|exhibit| async move {
            let amount = exhibit.placements.len();
            if amount == 0 {
                log::warn!("Exhibit {} has no placements.", exhibit.name);
            }
            let model = load_model(&exhibit.path, amount, &ctx.device, &ctx.queue)
                .await
                .with_context(|| format!("cannot load the {} ({})", exhibit.name, exhibit.path))?;
            let mut root = ContainerNode::new(amount);
            for (idx, placement) in exhibit.placements.iter().enumerate() {
                root.set_local_transform(idx, placement.to_instance());
            }
            root.add_child(model);
            root.update_world_transform_all();
            root.write_to_buffers(&ctx.queue);
            anyhow::Ok(LoadedExhibit {
                name: exhibit.name.clone(),
                root,
            })
        });
        let exhibits = futures::future::join_all(loads)
            .await
            .into_iter()
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            exhibits,
            controlled,
        })
    }
}

impl GraphicsFlow<ZooState> for ZooFlow {
    fn on_window_events(&mut self, _ctx: &Context, _state: &mut ZooState, event: &WindowEvent) -> Out {
        if let (
            Some(controlled),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            },
        ) = (&mut self.controlled, event)
        {
            controlled.controller.process_keyboard(*key, *state);
        }
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, state: &mut ZooState, dt: Duration) -> Out {
        if state.stage != Stage::Zoo {
            return Out::Empty;
        }
        let Some(controlled) = &mut self.controlled else {
            return Out::Empty;
        };
        if !controlled.controller.update(dt) {
            return Out::Empty;
        }
        if let Some(exhibit) = self.exhibits.get_mut(controlled.exhibit) {
            let placement = controlled.controller.placement();
            exhibit
                .root
                .set_local_transform(controlled.instance, placement.to_instance());
            exhibit.root.update_world_transform_all();
            exhibit.root.write_to_buffers(&ctx.queue);
            log::info!("{} #{}: {}", exhibit.name, controlled.instance, placement);
        }
        Out::Empty
    }

    fn on_render(&self, state: &ZooState) -> Render<'_> {
        if state.stage != Stage::Zoo {
            return Render::None;
        }
        Render::Composed(
            self.exhibits
                .iter()
                .map(|exhibit| Render::from(&exhibit.root as &dyn SceneNode))
                .collect(),
        )
    }
}
