// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

#![allow(clippy::all)]

mod integration_tests {
    pub mod high_resolution_speed_and_heading;
    pub mod minimal_position_report;
    pub mod rate_limit_trip;
    pub mod repeating_sensor_array;
    pub mod string_field_with_early_terminator;
}
