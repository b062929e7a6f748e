use crate::command::MmseqsCommand;
use crate::error::Result;
use crate::param::Param;
use crate::value::{Value, ValueKind};

/// The parameter table for `mmseqs createdb`.
///
/// Expected shape: `createdb INPUT.fasta [INPUT2.fasta ...] OUT_DB [OPTIONS]`.
pub fn createdb() -> MmseqsCommand {
    let mut cmd = MmseqsCommand::new("createdb");

    cmd.add_param(
        Param::input_file("input_files")
            .multiple()
            .with_description("input FASTA file(s)"),
    );
    cmd.add_param(Param::output_file("output_db").with_description("output database path prefix"));
    cmd.add_param(
        Param::option("dbtype", ValueKind::Int)
            .with_default(0)
            .with_choices([0, 1, 2])
            .with_description("database type (0: auto-detect, 1: amino acid, 2: nucleotide)"),
    );
    cmd.add_param(
        Param::flag("shuffle")
            .with_default(true)
            .with_description("shuffle input database entries"),
    );
    cmd.add_param(
        Param::option("createdb_mode", ValueKind::Int)
            .with_default(0)
            .with_choices([0, 1])
            .with_description("createdb mode (0: copy data, 1: soft-link data)"),
    );
    cmd.add_param(
        Param::option("id_offset", ValueKind::Int)
            .with_default(0)
            .with_description("numeric id offset in the index file"),
    );
    cmd.add_param(
        Param::flag("compressed").with_description("write compressed output files"),
    );
    cmd.add_param(
        Param::option("v", ValueKind::Int)
            .with_default(3)
            .with_choices([0, 1, 2, 3])
            .with_description("verbosity (0: quiet, 1: +errors, 2: +warnings, 3: +info)"),
    );
    cmd.add_param(
        Param::flag("write_lookup")
            .with_default(true)
            .with_description("write a .lookup file mapping ids to FASTA headers"),
    );

    cmd
}

/// A `createdb` command with its required positionals already set.
///
/// Input paths are validated here, so a missing FASTA file fails
/// immediately rather than at run time.
pub fn createdb_with<I, V, P>(input_files: I, output_db: P) -> Result<MmseqsCommand>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
    P: Into<Value>,
{
    let mut cmd = createdb();
    cmd.set(
        "input_files",
        input_files.into_iter().map(Into::into).collect::<Vec<Value>>(),
    )?;
    cmd.set("output_db", output_db)?;
    Ok(cmd)
}
