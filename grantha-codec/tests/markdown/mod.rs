mod frontmatter;
mod hierarchy;
mod integrity;
mod snapshot;
