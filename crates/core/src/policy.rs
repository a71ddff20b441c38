// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Tunables for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePolicy {
    /// Whether `resolve_period` walks Saturdays and Sundays. Statistics
    /// always skip them.
    pub include_weekends_in_period: bool,
    /// Extra days loaded on both sides of the target week when validating a
    /// request, so remote runs crossing the week boundary are seen.
    pub override_window_padding_days: u8,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            include_weekends_in_period: false,
            override_window_padding_days: 14,
        }
    }
}
