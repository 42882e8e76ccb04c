//! Startup banner.

pub const BANNER: &str = r"
             __                        __            __
  ___  _  __/ /____  _________  ____ _/ /     ____  / /_  ____
 / _ \| |/_/ __/ _ \/ ___/ __ \/ __ `/ /_____/ __ \/ __ \/ ___/
/  __/>  </ /_/  __/ /  / / / / /_/ / /_____/ /_/ / / / (__  )
\___/_/|_|\__/\___/_/  /_/ /_/\__,_/_/      \__,_/_/ /_/____/
";

/// The banner followed by the crate name and version.
pub fn render() -> String {
    format!(
        "{BANNER}\n {} webhook\n version: {}\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}
