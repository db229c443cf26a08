// ─── InterfaceOficial Classpath Core ───
// Decides which jars make up a version's launch classpath.
//
// Architecture:
//   core/
//     version/    — Version JSON model, OS rules, version ordering
//     launch/     — Artifact validation, classpath accumulator, resolver, dedupe
//     downloader/ — Acquisition seam + concurrent SHA-1 validated downloads
//     settings    — Launcher settings and game directory layout

pub mod downloader;
pub mod error;
pub mod http;
pub mod launch;
pub mod settings;
pub mod version;
