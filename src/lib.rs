// Copyright 2025 0xjcf
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
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg_attr(not(any(feature = "std", test)), no_std)]

//! # arbor
//! Hierarchical, history-aware statecharts executed from static tables.
//!
//! This crate re-exports the engine from `arbor-core` and ships `lamp`, a
//! small machine that exercises history, choice points and the `do` event.
//! The `arbor` binary (feature `cli`) drives it from the command line.

pub use arbor_core::core;
pub use arbor_core::{
    DefinitionError, DispatchResult, EventIdentity, MAX_DEPTH, MAX_HISTORY_POINTS,
    MAX_RESOLUTION_STEPS, Machine, MachineError, StateIdentity, StateMachine, prelude,
};

#[cfg(feature = "diagram")]
pub use arbor_core::diagram;

pub mod lamp;
