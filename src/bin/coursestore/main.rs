use structopt::StructOpt;

use coursestore::{
    locator::CourseLocator,
    model::Fields,
    scope::StaticRegistry,
    store::MemoryConnector,
    versioning::{CreateCourseMode, CreateCourseRequest, CreateItemRequest, VersioningCore},
    Result,
};

/// Demo CLI over an in-process `coursestore`. Every invocation starts from
/// an empty [MemoryConnector] — this exists to exercise the engine end to
/// end, not as a deployable service. The document-store driver and
/// block-class registry are external collaborators in a real deployment;
/// here they're a throwaway in-memory store and a static field table.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(subcommand)]
    subcmd: SubCommand,
}

#[derive(Clone, StructOpt)]
pub enum SubCommand {
    /// Create a course with a single root block and print its package id.
    CreateCourse {
        #[structopt(long = "org", help = "organization the course belongs to")]
        org: String,

        #[structopt(long = "id-root", help = "desired package id prefix")]
        id_root: Option<String>,

        #[structopt(long = "user", default_value = "cli")]
        user: String,

        #[structopt(long = "branch", default_value = "draft")]
        branch: String,
    },
    /// Add a child block under an existing course's root and print the
    /// resulting structure id.
    AddChapter {
        #[structopt(long = "package")]
        package_id: String,

        #[structopt(long = "branch", default_value = "draft")]
        branch: String,

        #[structopt(long = "user", default_value = "cli")]
        user: String,

        #[structopt(long = "parent", default_value = "course")]
        parent_block_id: String,

        #[structopt(long = "category", default_value = "chapter")]
        category: String,
    },
}

fn main() {
    env_logger::init();
    let opts = Opt::from_iter(std::env::args_os());

    let res = handle_subcmd(opts);
    res.map_err(|e| println!("Error: {}", e)).ok();
}

fn handle_subcmd(opts: Opt) -> Result<()> {
    // A fresh in-memory connector per invocation: nothing here persists
    // across runs. DocumentConnector is a narrow interface; this crate
    // provides one demo implementation of it, not a backing store this
    // binary owns the lifecycle of.
    let connector = MemoryConnector::new();
    let registry = StaticRegistry::new()
        .with_inheritable(&["visible_to_staff_only", "due"])
        .with_content_fields("course", &["data"])
        .with_content_fields("chapter", &["data"]);
    let core = VersioningCore::new(&connector, &registry);

    match opts.subcmd {
        SubCommand::CreateCourse {
            org,
            id_root,
            user,
            branch,
        } => {
            let package_id = core.create_course(CreateCourseRequest {
                org,
                id_root,
                user,
                master_branch: branch,
                mode: CreateCourseMode::Fresh {
                    root_category: "course".to_string(),
                    root_fields: Fields::new(),
                },
                versions_dict: None,
            })?;
            println!("{}", package_id);
            Ok(())
        }
        SubCommand::AddChapter {
            package_id,
            branch,
            user,
            parent_block_id,
            category,
        } => {
            let descriptor = core.create_item(CreateItemRequest {
                course: CourseLocator::by_branch(package_id, branch),
                parent_block_id: Some(parent_block_id),
                block_id: None,
                category,
                definition_id: None,
                fields: Fields::new(),
                user,
                force: false,
                continue_version: false,
            })?;
            println!("{} {}", descriptor.structure_id, descriptor.block_id);
            Ok(())
        }
    }
}
