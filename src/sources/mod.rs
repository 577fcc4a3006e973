pub mod archlinux;
pub mod parser;

use crate::config::Settings;
use crate::traits::MirrorSource;
use reqwest::Client;

pub use parser::parse_mirror_list;

pub fn get_source(client: Client, settings: &Settings) -> Box<dyn MirrorSource> {
    Box::new(archlinux::ArchLinuxSource::new(
        client,
        settings.protocol,
        settings.mirror_list_timeout,
    ))
}
