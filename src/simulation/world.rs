//! ChaseWorld - the composition root holding everything one round needs

use ahash::AHashSet;
use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::agent::{Agent, DecisionEngine};
use crate::core::config::ChaseConfig;
use crate::core::error::{ChaseError, Result};
use crate::core::types::{AgentId, ConsumableId, Direction, Tick};
use crate::motion::obstacles::ObstacleLayer;
use crate::navigation::graph::WaypointGraph;
use crate::sensing::forage::Consumable;
use crate::simulation::layout::{GridLayout, ITEM_POINTS};
use crate::simulation::predator::{Predator, PredatorScript};

/// World state for one chase simulation
pub struct ChaseWorld {
    pub config: ChaseConfig,
    pub graph: WaypointGraph,
    pub obstacles: ObstacleLayer,
    pub agents: Vec<Agent>,
    pub predator: Option<Predator>,
    pub script: Option<PredatorScript>,
    /// Shared item list; only the harness flips the active flag
    pub consumables: Vec<Consumable>,
    /// Agents the predator has caught this round
    pub caught: AHashSet<AgentId>,
    pub current_tick: Tick,
    /// Seconds since round start
    pub elapsed: f32,
    /// Points collected this round
    pub score: u32,
    pub(crate) engine: DecisionEngine,
    /// Random number generator (deterministic)
    rng: ChaCha8Rng,
    next_agent_id: u32,
}

impl ChaseWorld {
    /// Fails when `config` does not validate
    pub fn new(
        config: ChaseConfig,
        graph: WaypointGraph,
        obstacles: ObstacleLayer,
    ) -> Result<Self> {
        let engine = DecisionEngine::new(&config)?;
        let rng = ChaCha8Rng::seed_from_u64(config.simulation.seed);
        Ok(Self {
            config,
            graph,
            obstacles,
            agents: Vec::new(),
            predator: None,
            script: None,
            consumables: Vec::new(),
            caught: AHashSet::new(),
            current_tick: 0,
            elapsed: 0.0,
            score: 0,
            engine,
            rng,
            next_agent_id: 0,
        })
    }

    /// Build a world from a grid layout, spawning everything it marks
    ///
    /// Agents spawn with seeded random headings.
    pub fn from_layout(config: ChaseConfig, layout: &GridLayout) -> Result<Self> {
        let graph = layout.graph(config.graph.capture_radius);
        let mut world = Self::new(config, graph, layout.obstacles.clone())?;
        for spawn in &layout.agent_spawns {
            world.spawn_agent(*spawn, None);
        }
        if let Some(spawn) = layout.predator_spawn {
            world.spawn_predator(spawn);
        }
        for item in &layout.items {
            world.add_consumable(*item, ITEM_POINTS);
        }
        tracing::info!(
            "Built world: {} nodes, {} agents, {} items",
            world.graph.len(),
            world.agents.len(),
            world.consumables.len()
        );
        Ok(world)
    }

    /// Spawn a prey agent; `None` draws a random cardinal heading
    pub fn spawn_agent(&mut self, position: Vec2, initial_direction: Option<Direction>) -> AgentId {
        let direction = initial_direction
            .unwrap_or_else(|| Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())]);
        let id = AgentId(self.next_agent_id);
        self.next_agent_id += 1;
        self.agents
            .push(Agent::new(id, position, Some(direction), &self.config));
        tracing::debug!("Spawned agent {:?} at {:?} heading {:?}", id, position, direction);
        id
    }

    pub fn spawn_predator(&mut self, position: Vec2) {
        self.predator = Some(Predator::new(position, &self.config.motion));
    }

    pub fn set_predator_script(&mut self, script: PredatorScript) {
        self.script = Some(script);
    }

    pub fn add_consumable(&mut self, position: Vec2, points: u32) -> ConsumableId {
        let id = self.consumables.len() as u32;
        self.consumables.push(Consumable::new(id, position, points));
        ConsumableId(id)
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id() == id)
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn active_items(&self) -> usize {
        self.consumables.iter().filter(|c| c.active).count()
    }

    /// Configuration problems and missing collaborators
    ///
    /// None of these stop the simulation: agents without a predator simply
    /// forage, and agents without items keep roaming.
    pub fn diagnostics(&self) -> Vec<ChaseError> {
        let mut problems = self.graph.diagnostics();
        if self.predator.is_none() {
            problems.push(ChaseError::MissingReference(
                "no predator: threat terms evaluate to zero".into(),
            ));
        }
        if self.consumables.is_empty() {
            problems.push(ChaseError::MissingReference(
                "no consumables: forage terms evaluate to zero".into(),
            ));
        }
        problems
    }

    /// Agents still roaming
    pub fn free_agents(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| !self.caught.contains(&a.id()))
            .count()
    }

    /// Restart the round: agents, predator, script and items
    ///
    /// The RNG is not reseeded, so headings drawn at spawn stay as they
    /// were.
    pub fn reset_round(&mut self) {
        for agent in &mut self.agents {
            agent.reset();
        }
        if let Some(predator) = &mut self.predator {
            predator.reset();
        }
        if let Some(script) = &mut self.script {
            script.restart();
        }
        for item in &mut self.consumables {
            item.active = true;
        }
        self.caught.clear();
        self.current_tick = 0;
        self.elapsed = 0.0;
        self.score = 0;
        tracing::info!("Round reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::layout::DEMO_LAYOUT;

    fn demo_world(seed: u64) -> ChaseWorld {
        let mut config = ChaseConfig::default();
        config.simulation.seed = seed;
        let layout = GridLayout::parse(DEMO_LAYOUT).unwrap();
        ChaseWorld::from_layout(config, &layout).unwrap()
    }

    #[test]
    fn test_layout_spawns_everything() {
        let world = demo_world(0);
        assert_eq!(world.agents.len(), 4);
        assert!(world.predator.is_some());
        assert_eq!(world.active_items(), 11);
        assert!(world.agents.iter().all(|a| a.direction().is_some()));
    }

    #[test]
    fn test_headings_follow_seed() {
        let headings = |seed| {
            demo_world(seed)
                .agents
                .iter()
                .map(|a| a.direction())
                .collect::<Vec<_>>()
        };
        assert_eq!(headings(7), headings(7));
    }

    #[test]
    fn test_explicit_heading_is_kept() {
        let mut world = demo_world(0);
        let id = world.spawn_agent(Vec2::new(1.5, 1.5), Some(Direction::Left));
        assert_eq!(world.agent(id).unwrap().direction(), Some(Direction::Left));
        assert_eq!(id, AgentId(4));
    }

    #[test]
    fn test_diagnostics_report_missing_predator() {
        let mut world = demo_world(0);
        assert!(world.diagnostics().is_empty());

        world.predator = None;
        let problems = world.diagnostics();
        assert_eq!(problems.len(), 1);
        assert!(matches!(problems[0], ChaseError::MissingReference(_)));
    }

    #[test]
    fn test_free_agents_ignores_unknown_caught_ids() {
        let mut world = demo_world(0);
        world.caught.insert(AgentId(0));
        world.caught.insert(AgentId(40));
        world.caught.insert(AgentId(41));
        world.caught.insert(AgentId(42));
        world.caught.insert(AgentId(43));
        assert_eq!(world.free_agents(), 3);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ChaseConfig::default();
        config.agent.panic_speed = 0.0;
        let layout = GridLayout::parse(DEMO_LAYOUT).unwrap();
        let result = ChaseWorld::from_layout(config, &layout);
        assert!(matches!(result, Err(ChaseError::InvalidParameter(_))));
    }

    #[test]
    fn test_reset_round_reactivates_items() {
        let mut world = demo_world(0);
        world.consumables[0].active = false;
        world.caught.insert(AgentId(1));
        world.score = 20;
        world.current_tick = 99;

        world.reset_round();
        assert_eq!(world.active_items(), 11);
        assert!(world.caught.is_empty());
        assert_eq!(world.score, 0);
        assert_eq!(world.current_tick, 0);
    }
}
