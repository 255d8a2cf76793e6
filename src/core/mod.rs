// ─── Server Launcher Core ───
// Backend for installing and supervising a local Minecraft server.
//
// Architecture:
//   core/
//     instance/   — Saved selection, config file store, workspace layout
//     version/    — Static catalog of supported server builds
//     downloader/ — Single-shot artifact download
//     loaders/    — Forge, Fabric, Vanilla artifacts + Forge installer
//     java/       — `java -version` check
//     launch/     — Server process, supervisor loop, tunnel bridge
//     state/      — Resolved settings and shared services
//     console     — Line-based operator console

pub mod console;
pub mod downloader;
pub mod error;
pub mod http;
pub mod instance;
pub mod java;
pub mod launch;
pub mod loaders;
pub mod state;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;
