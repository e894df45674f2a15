//! Minimal HTML report builder: titled sections holding interleaved text
//! blocks and Plotly plots, rendered to a standalone page.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em auto; max-width: 60em; color: #222; }\n\
header { border-bottom: 1px solid #ccc; margin-bottom: 2em; }\n\
header img { max-height: 4em; }\n\
h2 { margin-top: 2em; }\n\
.meta { color: #777; font-size: 0.85em; }\n\
.plot { margin: 1em 0; }";

enum Block {
    Content(Markup),
    Plot(Plot),
}

/// One titled report section with ordered content and plot blocks.
pub struct ReportSection {
    title: String,
    blocks: Vec<Block>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.blocks.push(Block::Content(content));
    }

    pub fn add_plot(&mut self, plot: Plot) {
        self.blocks.push(Block::Plot(plot));
    }
}

/// A report document. Sections render in insertion order; the page pulls
/// plotly.js from its CDN so the file stands alone.
pub struct Report {
    title: String,
    version: String,
    logo: Option<String>,
    subtitle: String,
    created: DateTime<Local>,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str, version: &str, logo: Option<&str>, subtitle: &str) -> Self {
        Report {
            title: title.to_string(),
            version: version.to_string(),
            logo: logo.map(String::from),
            subtitle: subtitle.to_string(),
            created: Local::now(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        fs::write(path, self.render().into_string())
    }

    fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src="https://cdn.plot.ly/plotly-2.12.1.min.js" {}
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    header {
                        @if let Some(logo) = &self.logo {
                            img src=(logo) alt="logo";
                        }
                        h1 { (self.title) }
                        p { (self.subtitle) }
                        p.meta {
                            "Version " (self.version)
                            ", generated " (self.created.format("%Y-%m-%d %H:%M:%S").to_string())
                        }
                    }
                    @for (si, sec) in self.sections.iter().enumerate() {
                        section {
                            h2 { (sec.title) }
                            @for (bi, block) in sec.blocks.iter().enumerate() {
                                @match block {
                                    Block::Content(markup) => {
                                        div { (markup) }
                                    }
                                    Block::Plot(plot) => {
                                        div.plot {
                                            (PreEscaped(plot.to_inline_html(Some(&format!("plot-{}-{}", si, bi)))))
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
