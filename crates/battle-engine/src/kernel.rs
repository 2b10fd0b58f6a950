//! The per-tick scheduler: the component that ties the arena, the VM,
//! scoring, kill attribution, and replay emission together.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use battle_arena::Arena;
use battle_core::{AgentId, Config, EngineError, WinMode};
use battle_replay::{
    AgentSnapshot, Event, Header, MemoryDiff, ReplaySink, ScoreMap, Summary, SummaryAgent,
    TickRecord,
};
use battle_vm::Agent;

use crate::error::KernelError;
use crate::stats::AgentStats;

/// Per-tick scheduler and scoring engine.
///
/// One-shot: construct with [`Kernel::new`], [`Kernel::spawn`] every
/// agent, then call [`Kernel::run`] exactly once.
pub struct Kernel<W: Write> {
    config: Config,
    arena: Arena,
    agents: Vec<Agent>,
    score: ScoreMap,
    stats: IndexMap<AgentId, AgentStats>,
    alive_prev: IndexMap<AgentId, bool>,
    sink: ReplaySink<W>,
    summary_path: Option<PathBuf>,
    tick: u64,
    last_summary: Option<Summary>,
    /// Seeded at construction from `config.seed`; unused by stepping
    /// today. Reserved for future stochastic tiebreaking.
    rng: ChaCha8Rng,
}

impl<W: Write> Kernel<W> {
    /// Construct a kernel from `config` (clamped at construction) and a
    /// replay sink. Does not write the replay header yet — that happens
    /// on the first call to [`Kernel::run`].
    pub fn new(config: Config, sink: ReplaySink<W>) -> Result<Self, KernelError> {
        let config = config.clamped();
        let arena = Arena::new(config.arena_size)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            arena,
            agents: Vec::new(),
            score: ScoreMap::new(),
            stats: IndexMap::new(),
            alive_prev: IndexMap::new(),
            sink,
            summary_path: None,
            tick: 0,
            last_summary: None,
            rng,
        })
    }

    /// Have the kernel best-effort write `summary.json` to `path`
    /// alongside the replay when [`Kernel::run`] finishes.
    pub fn with_summary_path(mut self, path: impl AsRef<Path>) -> Self {
        self.summary_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// The RNG seeded from `config.seed`. Currently unused by the
    /// scheduler; exposed for forward compatibility only.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Spawn an agent: loads `code` into the arena at `entry` and adds it
    /// to the creation-ordered roster that [`Kernel::run`] steps.
    ///
    /// Fails if `id` duplicates an already-spawned agent, `code` is empty,
    /// or `code` is longer than the arena.
    pub fn spawn(
        &mut self,
        id: impl Into<AgentId>,
        entry: u32,
        code: &[u8],
    ) -> Result<(), KernelError> {
        let id = id.into();
        if self.score.contains_key(&id) {
            return Err(KernelError::Spawn(EngineError::DuplicateAgentId {
                id: id.as_str().to_string(),
            }));
        }
        if code.is_empty() {
            return Err(KernelError::Spawn(EngineError::EmptyCode {
                id: id.as_str().to_string(),
            }));
        }
        if code.len() as u32 > self.arena.len() {
            return Err(KernelError::Spawn(EngineError::CodeExceedsArena {
                id: id.as_str().to_string(),
                code_len: code.len(),
                arena_size: self.arena.len(),
            }));
        }

        let (start, end) = self.arena.load_code(&id, entry, code);
        let agent = Agent::new(id.clone(), start, (start, end));
        self.agents.push(agent);
        self.score.insert(id.clone(), 0);
        self.stats.insert(id.clone(), AgentStats::default());
        self.alive_prev.insert(id, true);
        Ok(())
    }

    /// Count of agents still alive.
    fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }

    /// Run up to `max_ticks` ticks, breaking early once at most one agent
    /// is alive. Returns the winning agent id, or `""` if there is none.
    pub fn run(&mut self, max_ticks: u64) -> Result<String, KernelError> {
        self.sink.write_header(&Header::new(self.config.clone()))?;

        for t in 1..=max_ticks {
            self.tick = t;
            self.run_one_tick()?;
            if self.alive_count() <= 1 {
                break;
            }
        }

        self.sink.flush()?;

        let winner = self.resolve_winner();
        let summary = self.build_summary(&winner);
        if let Some(path) = &self.summary_path {
            write_summary_best_effort(&summary, path);
        }
        self.last_summary = Some(summary);
        Ok(winner)
    }

    /// The summary built at the end of the most recent [`Kernel::run`]
    /// call, if any has completed.
    pub fn last_summary(&self) -> Option<&Summary> {
        self.last_summary.as_ref()
    }

    fn run_one_tick(&mut self) -> Result<(), KernelError> {
        self.arena.begin_tick();
        let mut events = Vec::new();

        let quota = self.config.instr_per_tick;
        for i in 0..self.agents.len() {
            if !self.agents[i].alive {
                continue;
            }
            self.agents[i].cpu_used = 0;
            for _ in 0..quota {
                if !self.agents[i].alive {
                    break;
                }
                battle_vm::step(&mut self.agents[i], &mut self.arena);
                self.agents[i].cpu_used += 1;
                let id = self.agents[i].id.clone();
                self.stats.get_mut(&id).expect("spawned agent has a stats entry").total_cpu += 1;
            }
        }

        for agent in &self.agents {
            if agent.alive {
                self.stats
                    .get_mut(&agent.id)
                    .expect("spawned agent has a stats entry")
                    .alive_ticks += 1;
            }
        }

        for agent in &self.agents {
            let cells = self.arena.territory_of(&agent.id);
            self.stats
                .get_mut(&agent.id)
                .expect("spawned agent has a stats entry")
                .record_territory(cells);
        }

        for agent in &self.agents {
            if agent.alive {
                *self.score.get_mut(&agent.id).expect("spawned agent has a score entry") +=
                    i64::from(self.config.weights.alive);
            }
        }

        if self.config.weights.territory > 0 {
            for agent in &self.agents {
                let cells = self.stats[&agent.id].territory_last;
                let buckets = cells / self.config.weights.territory_bucket;
                if buckets > 0 {
                    *self.score.get_mut(&agent.id).expect("spawned agent has a score entry") +=
                        i64::from(buckets) * i64::from(self.config.weights.territory);
                }
            }
        }

        for i in 0..self.agents.len() {
            let id = self.agents[i].id.clone();
            let was_alive = self.alive_prev.get(&id).copied().unwrap_or(true);
            let is_alive = self.agents[i].alive;
            if was_alive && !is_alive {
                let pc = self.agents[i].pc;
                let killer = self.arena.writer_at(pc).cloned();
                match killer {
                    Some(killer_id) if killer_id != id => {
                        *self
                            .score
                            .get_mut(&killer_id)
                            .expect("spawned agent has a score entry") +=
                            i64::from(self.config.weights.kill);
                        self.stats
                            .get_mut(&killer_id)
                            .expect("spawned agent has a stats entry")
                            .kills += 1;
                        self.stats
                            .get_mut(&id)
                            .expect("spawned agent has a stats entry")
                            .deaths += 1;
                        events.push(Event::Kill {
                            victim: id.clone(),
                            by: killer_id,
                        });
                    }
                    _ => {
                        self.stats
                            .get_mut(&id)
                            .expect("spawned agent has a stats entry")
                            .deaths += 1;
                        events.push(Event::Death { victim: id.clone() });
                    }
                }
            }
        }

        let record = TickRecord {
            tick: self.tick,
            agents: self
                .agents
                .iter()
                .map(|a| AgentSnapshot {
                    id: a.id.clone(),
                    pc: a.pc,
                    alive: a.alive,
                    cpu_used: a.cpu_used,
                    mem_writes: a.mem_writes,
                    region: a.region,
                })
                .collect(),
            score: self.score.clone(),
            events,
            memory_diffs: self
                .arena
                .diff_runs()
                .iter()
                .map(|run| MemoryDiff {
                    addr: run.start,
                    len: run.len,
                    owner: run.writer.clone(),
                })
                .collect(),
        };
        self.sink.write_tick(&record)?;

        for agent in &self.agents {
            self.alive_prev.insert(agent.id.clone(), agent.alive);
        }

        Ok(())
    }

    fn resolve_winner(&self) -> String {
        let alive: Vec<&Agent> = self.agents.iter().filter(|a| a.alive).collect();
        if alive.len() == 1 {
            return alive[0].id.as_str().to_string();
        }
        match self.config.win_mode {
            WinMode::Survival => String::new(),
            WinMode::Score | WinMode::ScoreFallback => self.highest_unique_scorer(),
        }
    }

    /// The uniquely highest scorer, ranked `(-score, id)`, or `""` if the
    /// top score is tied.
    fn highest_unique_scorer(&self) -> String {
        let mut ranked: Vec<(&AgentId, i64)> =
            self.score.iter().map(|(id, score)| (id, *score)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        match ranked.as_slice() {
            [] => String::new(),
            [only] => only.0.as_str().to_string(),
            [top, second, ..] => {
                if top.1 > second.1 {
                    top.0.as_str().to_string()
                } else {
                    String::new()
                }
            }
        }
    }

    fn build_summary(&self, winner: &str) -> Summary {
        let ticks_run = self.tick;
        let arena_size = self.arena.len();
        let mut agents: Vec<SummaryAgent> = self
            .agents
            .iter()
            .map(|a| {
                let stats = &self.stats[&a.id];
                let territory_avg = stats.territory_avg(ticks_run);
                let pct = |cells: f64| -> f64 {
                    if arena_size == 0 {
                        0.0
                    } else {
                        cells * 100.0 / f64::from(arena_size)
                    }
                };
                SummaryAgent {
                    id: a.id.clone(),
                    alive: a.alive,
                    score: *self.score.get(&a.id).unwrap_or(&0),
                    alive_ticks: stats.alive_ticks,
                    kills: stats.kills,
                    deaths: stats.deaths,
                    cpu_total: stats.total_cpu,
                    mem_writes: a.mem_writes,
                    territory_last: stats.territory_last,
                    territory_max: stats.territory_max,
                    territory_avg,
                    territory_pct_last: pct(f64::from(stats.territory_last)),
                    territory_pct_max: pct(f64::from(stats.territory_max)),
                    territory_pct_avg: pct(territory_avg),
                }
            })
            .collect();
        agents.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));

        Summary {
            winner: winner.to_string(),
            win_mode: self.config.win_mode.to_string(),
            ticks: ticks_run,
            arena_size,
            config: self.config.clone(),
            score: self.score.clone(),
            agents,
        }
    }
}

/// Write `summary.json` to `path`, swallowing any I/O error — the replay
/// file is the authoritative record.
fn write_summary_best_effort(summary: &Summary, path: &Path) {
    let Ok(json) = serde_json::to_vec_pretty(summary) else {
        return;
    };
    let _ = fs::write(path, json);
}
