// Copyright 2025 Redshift Labs

pub mod fri;
