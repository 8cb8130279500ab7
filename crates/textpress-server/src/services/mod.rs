// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — constructs the pipeline, exporters and providers once at
// startup and hands them to the HTTP routes.

pub mod app_services;
pub mod data_dir;
