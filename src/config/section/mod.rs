//! Configuration section definitions.
//!
//! Each module corresponds to a section in `frappe.toml`:
//!
//! | Module    | TOML Section | Purpose                               |
//! |-----------|--------------|---------------------------------------|
//! | `bundler` | `[bundler]`  | Path comparison, failure policy       |
//! | `tools`   | `[tools]`    | LESS/template compilers, minifiers    |

mod bundler;
mod tools;

pub use bundler::BundlerConfig;
pub use tools::ToolsConfig;
