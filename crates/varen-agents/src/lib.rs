// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Varen Agents
//!
//! The simulation orchestrator. [`SimulationAgent::tick`] runs the fixed
//! per-frame phase order over every live entity: physics transform pull,
//! animation, player movement, the camera transition, and finally deferred
//! entity-deletion propagation. Entities are visited in slot order, which
//! makes a tick deterministic for a given store layout and input sequence.

pub mod occupancy;
pub mod sim_agent;

pub use occupancy::OccupancyGrid;
pub use sim_agent::{SimulationAgent, SimulationContext};
