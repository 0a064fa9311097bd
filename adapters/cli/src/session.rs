//! One server connection's worth of state and its tick loop.

use std::io::{BufRead, Write};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rts_client_core::{CommandBatch, Event, GameUpdate};
use rts_client_system_harvest::Harvester;
use rts_client_system_navigation::NavMemory;
use rts_client_world::{self as world, query, World, WorldError};
use tracing::{debug, info, trace};

use crate::{
    config::ClientConfig,
    protocol::{LineChannel, ProtocolError},
};

/// World mirror, navigation memory and decision engine owned by a single
/// connection.
#[derive(Debug)]
pub struct Session {
    world: World,
    memory: NavMemory,
    harvester: Harvester,
    rng: ChaCha8Rng,
    stale_unit_ticks: Option<u64>,
}

impl Session {
    /// Creates a fresh session from the client configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            world: World::new(),
            memory: NavMemory::new(),
            harvester: Harvester::new(config.engine),
            rng,
            stale_unit_ticks: config.stale_unit_ticks,
        }
    }

    /// Merges an inbound update and returns the resulting world events.
    pub fn apply_update(&mut self, update: &GameUpdate) -> Result<Vec<Event>, WorldError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, update, &mut events)?;

        if let Some(max_age) = self.stale_unit_ticks {
            self.world.prune_stale(max_age, &mut events);
        }
        for event in &events {
            if let Event::UnitExpired { unit } = event {
                self.memory.forget(unit);
            }
        }

        Ok(events)
    }

    /// Decides this tick's commands.
    pub fn compute_commands(&mut self) -> CommandBatch {
        let mut commands = Vec::new();
        self.harvester
            .handle(&self.world, &mut self.memory, &mut self.rng, &mut commands);
        CommandBatch::from(commands)
    }

    /// Read-only access to the session's world mirror.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the session's navigation memory.
    #[must_use]
    pub fn memory(&self) -> &NavMemory {
        &self.memory
    }

    /// Serves ticks until the peer closes the connection; returns the number
    /// of ticks answered.
    pub fn run<R, W>(&mut self, channel: &mut LineChannel<R, W>) -> Result<u64, ProtocolError>
    where
        R: BufRead,
        W: Write,
    {
        let engine = self.harvester.config();
        debug!(
            carry_threshold = engine.carry_threshold(),
            entry_hand = ?engine.entry_hand(),
            worker_cost = ?engine.worker_cost(),
            "session.engine"
        );

        let mut ticks = 0_u64;
        while let Some(update) = channel.read_update()? {
            for event in self.apply_update(&update)? {
                log_event(&event);
            }
            trace!(
                known_resources = query::resource_count(&self.world),
                known_units = query::units(&self.world).count(),
                known_workers = query::workers(&self.world).count(),
                "world.synced"
            );

            let batch = self.compute_commands();
            for command in &batch.commands {
                if let Some(unit) = query::unit(&self.world, command.unit()) {
                    trace!(unit = %unit.id, pos = %unit.pos, ?command, "command.issued");
                }
            }
            debug!(
                tick = query::tick(&self.world),
                commands = batch.commands.len(),
                "tick.answered"
            );
            channel.write_batch(&batch)?;
            ticks += 1;
        }
        Ok(ticks)
    }
}

fn log_event(event: &Event) {
    match event {
        Event::GridInitialized { width, height } => {
            info!(width, height, "grid.initialized");
        }
        Event::ResourceDiscovered { pos, amount } => {
            debug!(%pos, amount, "resource.discovered");
        }
        Event::ResourceChanged { pos, amount } => {
            trace!(%pos, amount, "resource.changed");
        }
        Event::ResourceDepleted { pos } => {
            debug!(%pos, "resource.depleted");
        }
        Event::UnitSighted { unit, kind } => {
            debug!(%unit, %kind, "unit.sighted");
        }
        Event::UnitExpired { unit } => {
            debug!(%unit, "unit.expired");
        }
        Event::TileIgnored { pos } => {
            debug!(%pos, "tile.ignored_out_of_bounds");
        }
    }
}
