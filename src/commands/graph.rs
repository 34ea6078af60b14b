use crate::artifacts::report::graph::GraphGenerator;
use crate::artifacts::report::reporter::Reporter;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    pub height: usize,
    pub width: usize,
}

impl Reporter {
    pub fn show_graph(&self, results_file: &Path, opts: GraphOptions) -> anyhow::Result<()> {
        if opts.height == 0 || opts.width == 0 {
            anyhow::bail!("graph height and width must be greater than zero");
        }

        let record = self.load(results_file)?;
        self.print_graph(&record, &GraphGenerator::new(opts.height, opts.width))?;

        Ok(())
    }
}
