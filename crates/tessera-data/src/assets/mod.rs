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

//! Resource caches and the owning registry.
//!
//! The two structures form the dual-ownership scheme of the resource runtime:
//! the [`ResourceRegistry`] holds the only long-lived strong handle of each
//! loaded resource, while each [`ResourceCache`] only holds a weak view keyed by
//! the same id. A cache entry therefore resolves exactly as long as someone
//! (the registry or a consumer) still owns the instance.

mod cache;
mod registry;

pub use cache::*;
pub use registry::*;
