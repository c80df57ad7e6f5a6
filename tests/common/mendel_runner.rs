use std::path::PathBuf;

use clap::Parser;
use parser::Cli;

use super::Fixture;

/// A ready to run `mendel-rs` invocation, along with the temporary files it relies on.
pub struct MendelRunner {
    args      : String,
    output_dir: Fixture,
    output    : Option<String>,
    _table    : Fixture,
}

impl MendelRunner {
    pub fn cli(&self) -> Cli {
        Cli::try_parse_from(self.args.split_whitespace()).expect("Invalid command line arguments")
    }

    pub fn run(&self) -> anyhow::Result<()> {
        mendel_rs::run(self.cli())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.to_path_buf()
    }

    /// Location of the distribution table, if one was requested.
    pub fn output_file(&self) -> Option<PathBuf> {
        self.output.as_ref().map(|output| self.output_dir.join(output))
    }
}

#[derive(Default)]
pub struct MendelRunnerBuilder {
    module     : Option<&'static str>,
    table      : Option<&'static str>,
    parents    : Option<[&'static str; 2]>,
    genotypes  : Vec<&'static str>,
    generations: Option<usize>,
    threads    : Option<usize>,
    max_loci   : Option<usize>,
    output     : Option<&'static str>,
    overwrite  : bool,
    strict     : bool,
}

impl MendelRunnerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(mut self, module: &'static str) -> Self {
        self.module = Some(module);
        self
    }

    pub fn set_table(mut self, table: &'static str) -> Self {
        self.table = Some(table);
        self
    }

    pub fn set_parents(mut self, parent1: &'static str, parent2: &'static str) -> Self {
        self.parents = Some([parent1, parent2]);
        self
    }

    pub fn add_genotype(mut self, genotype: &'static str) -> Self {
        self.genotypes.push(genotype);
        self
    }

    pub fn set_generations(mut self, generations: usize) -> Self {
        self.generations = Some(generations);
        self
    }

    pub fn set_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn set_max_loci(mut self, max_loci: usize) -> Self {
        self.max_loci = Some(max_loci);
        self
    }

    pub fn set_output(mut self, output: &'static str) -> Self {
        self.output = Some(output);
        self
    }

    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn build(self) -> Result<MendelRunner, String> {
        let module = self.module.ok_or("Missing subcommand")?;
        let table  = Fixture::copy(self.table.ok_or("Missing phenotype table")?);
        let output_dir = Fixture::blank("mendel-test-output");

        let mut args = format!("mendel-rs {module} --table {table}");
        if self.strict {
            args.push_str(" --strict");
        }

        match module {
            "cross" => {
                let [parent1, parent2] = self.parents.ok_or("Missing parents")?;
                args.push_str(&format!(" --parents {parent1} {parent2} --output-dir {output_dir}"));
                let options = [("--generations", self.generations), ("--threads", self.threads), ("--max-loci", self.max_loci)];
                for (flag, value) in options {
                    if let Some(value) = value {
                        args.push_str(&format!(" {flag} {value}"));
                    }
                }
                if let Some(output) = self.output {
                    args.push_str(&format!(" --output {output}"));
                }
                if self.overwrite {
                    args.push_str(" --overwrite");
                }
            },
            "phenotype" => {
                self.genotypes.iter().for_each(|genotype| args.push_str(&format!(" {genotype}")));
            },
            other => return Err(format!("Unsupported subcommand {other}"))
        }

        Ok(MendelRunner{args, output_dir, output: self.output.map(str::to_string), _table: table})
    }
}
