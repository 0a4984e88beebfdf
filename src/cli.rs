// Copyright 2025 Fernando Borretti
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


use std::process::exit;

use clap::Parser;
use clap::ValueEnum;
use eduview_core::deck::KindFilter;
use eduview_core::error::Fallible;
use eduview_core::types::kind::ContentKind;
use tokio::spawn;

use crate::cmd::check::check_directory;
use crate::cmd::content::read_config;
use crate::cmd::extract::extract_file;
use crate::cmd::view::server::ServerConfig;
use crate::cmd::view::server::start_server;
use crate::utils::wait_for_server;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum KindArg {
    /// Question and answer cards.
    Flashcards,
    /// Short revision notes.
    Notes,
    /// Concept mastery cards.
    Concepts,
    /// Lesson plans.
    Lessons,
}

impl From<KindArg> for ContentKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Flashcards => ContentKind::Flashcards,
            KindArg::Notes => ContentKind::Notes,
            KindArg::Concepts => ContentKind::Concepts,
            KindArg::Lessons => ContentKind::Lessons,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum FilterArg {
    All,
    Question,
    Note,
    Fact,
}

impl From<FilterArg> for KindFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => KindFilter::All,
            FilterArg::Question => KindFilter::Question,
            FilterArg::Note => KindFilter::Note,
            FilterArg::Fact => KindFilter::Fact,
        }
    }
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Print the records of a content file as JSON.
    Extract {
        /// Path to the content file.
        file: String,
        /// The kind of content. By default, the file's frontmatter decides, or the kind is guessed.
        #[arg(long)]
        kind: Option<KindArg>,
        /// Path to a JSON file holding already-structured lesson plans.
        #[arg(long)]
        raw_content: Option<String>,
    },
    /// Check that every content file in a directory yields records.
    Check {
        /// Path to the content directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Read every file as this kind of content.
        #[arg(long)]
        kind: Option<KindArg>,
    },
    /// Page through a content file in the browser.
    View {
        /// Path to the content file.
        file: String,
        /// The kind of content. By default, the file's frontmatter decides, or the kind is guessed.
        #[arg(long)]
        kind: Option<KindArg>,
        /// Path to a JSON file holding already-structured lesson plans.
        #[arg(long)]
        raw_content: Option<String>,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
        /// The flashcard filter to start with. Overrides the config file.
        #[arg(long)]
        filter: Option<FilterArg>,
        /// Path to a TOML viewer config file.
        #[arg(long)]
        config: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Extract {
            file,
            kind,
            raw_content,
        } => extract_file(file, kind.map(ContentKind::from), raw_content),
        Command::Check { directory, kind } => {
            check_directory(directory, kind.map(ContentKind::from))
        }
        Command::View {
            file,
            kind,
            raw_content,
            host,
            port,
            open_browser,
            filter,
            config,
        } => {
            let mut viewer = read_config(config)?;
            if let Some(filter) = filter {
                viewer.default_filter = filter.into();
            }
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig {
                file,
                kind: kind.map(ContentKind::from),
                raw_content,
                host,
                port,
                viewer,
            };
            start_server(config).await
        }
    }
}
