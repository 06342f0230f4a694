use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span, trace};

use doctype_expr::{DependencyMode, Expression, evaluate};
use doctype_layout::{CollapseState, LayoutEngine, LayoutResult};
use doctype_meta::{FormMetadata, format_duration, parse_duration};
use doctype_model::{
    DocumentSnapshot, FieldDefinition, SubTableRegistry, UserRoles, load_document, load_fields,
    load_sub_tables, value_text,
};

use crate::cli::{ConfigCommand, DurationCommand, EvalArgs, FormArgs, LayoutArgs, MetaArgs, ToggleArgs};
use crate::logging::redact_value;
use crate::render::{render_layout, to_json};
use crate::settings::{Settings, save_settings, settings_path};
use crate::state::{StateStore, form_name};

/// Field list, document and sub-tables read from disk.
struct FormInputs {
    fields: Vec<FieldDefinition>,
    doc: Option<DocumentSnapshot>,
    sub_tables: Option<SubTableRegistry>,
}

impl FormInputs {
    fn load(args: &FormArgs) -> Result<Self> {
        let fields = load_fields(&args.fields).context("load field list")?;
        let doc = load_optional_document(args.doc.as_deref())?;
        let sub_tables = args
            .sub_tables
            .as_deref()
            .map(load_sub_tables)
            .transpose()
            .context("load sub-tables")?;
        info!(
            fields = fields.len(),
            has_doc = doc.is_some(),
            sub_tables = sub_tables.as_ref().map_or(0, SubTableRegistry::len),
            "loaded form"
        );
        Ok(Self {
            fields,
            doc,
            sub_tables,
        })
    }

    fn build(&self, roles: &UserRoles, collapse: &mut CollapseState) -> LayoutResult {
        let mut engine = LayoutEngine::new(roles);
        if let Some(registry) = &self.sub_tables {
            engine = engine.with_sub_tables(registry);
        }
        engine.build(&self.fields, self.doc.as_ref(), collapse)
    }
}

fn load_optional_document(path: Option<&Path>) -> Result<Option<DocumentSnapshot>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let doc = load_document(path).context("load document")?;
    for (name, value) in doc.iter() {
        let text = value_text(value).unwrap_or_default();
        trace!(field = name, value = redact_value(&text), "document value");
    }
    Ok(Some(doc))
}

fn state_path(args: &FormArgs, settings: &Settings) -> Option<PathBuf> {
    args.state_file
        .clone()
        .or_else(|| settings.collapse_state_path())
}

pub fn run_layout(args: &LayoutArgs, settings: &Settings) -> Result<String> {
    let form = args
        .form
        .form
        .clone()
        .unwrap_or_else(|| form_name(&args.form.fields));
    let span = info_span!("layout", form = %form);
    let _guard = span.enter();

    let inputs = FormInputs::load(&args.form)?;
    let roles = settings.roles(&args.form.roles);
    let state_file = if args.no_state {
        None
    } else {
        state_path(&args.form, settings)
    };
    let mut store = state_file
        .as_deref()
        .map(StateStore::load)
        .unwrap_or_default();
    let mut collapse = store.form(&form);
    let layout = inputs.build(&roles, &mut collapse);

    if settings.state.persist
        && let Some(path) = &state_file
        && collapse != store.form(&form)
    {
        store.set_form(form, collapse);
        store.save(path)?;
    }

    let format = args.format.map_or(settings.output.format, Into::into);
    render_layout(
        &layout,
        format,
        settings.output.pretty,
        inputs.doc.as_ref(),
        &roles,
    )
}

/// Flip one section and persist the result. Returns the new collapsed flag.
pub fn run_toggle(args: &ToggleArgs, settings: &Settings) -> Result<bool> {
    let form = args
        .form
        .form
        .clone()
        .unwrap_or_else(|| form_name(&args.form.fields));
    let Some(path) = state_path(&args.form, settings) else {
        bail!("no collapse state file: pass --state-file or set state.collapse_file");
    };
    let inputs = FormInputs::load(&args.form)?;
    let roles = settings.roles(&args.form.roles);

    let mut store = StateStore::load(&path);
    let mut collapse = store.form(&form);
    let layout = inputs.build(&roles, &mut collapse);
    let Some(collapsed) = collapse.toggle_section(&layout, args.section, args.tab.as_deref())
    else {
        match &args.tab {
            Some(tab) => bail!("tab `{tab}` has no collapsible section at index {}", args.section),
            None => bail!("no collapsible top-level section at index {}", args.section),
        }
    };
    store.set_form(form, collapse);
    store.save(&path)?;
    Ok(collapsed)
}

pub fn run_eval(args: &EvalArgs, settings: &Settings) -> Result<String> {
    let doc = load_optional_document(args.doc.as_deref())?;
    let roles = settings.roles(&args.roles);
    let mode = DependencyMode::from(args.mode);
    let result = evaluate(
        Some(&args.expression),
        doc.as_ref(),
        mode,
        args.base_required,
        &roles,
    );
    debug!(?mode, result, "evaluated");
    if !args.explain {
        return Ok(format!("{result}\n"));
    }
    let mut out = String::new();
    match Expression::parse(args.expression.trim()) {
        Ok(parsed) => {
            out.push_str(&format!("condition: {}\n", parsed.condition()));
            out.push_str(&format!("tree: {}\n", parsed.tree()));
        }
        Err(error) => {
            out.push_str(&format!("not evaluated: {error}\n"));
            out.push_str(&format!(
                "default: {}\n",
                mode.default_value(args.base_required)
            ));
        }
    }
    out.push_str(&format!("result: {result}\n"));
    Ok(out)
}

pub fn run_meta(args: &MetaArgs, settings: &Settings) -> Result<String> {
    let fields = load_fields(&args.fields).context("load field list")?;
    let doc = load_optional_document(args.doc.as_deref())?;
    let metadata = FormMetadata::extract(&fields, doc.as_ref());
    to_json(&metadata, settings.output.pretty)
}

pub fn run_duration(command: &DurationCommand) -> String {
    match command {
        DurationCommand::Parse { value } => match parse_duration(value) {
            Some(seconds) => format!("{seconds}\n"),
            None => "\n".to_string(),
        },
        DurationCommand::Format { seconds } => format!("{}\n", format_duration(*seconds)),
    }
}

pub fn run_config(
    command: &ConfigCommand,
    settings: &Settings,
    explicit: Option<&Path>,
) -> Result<String> {
    let path = explicit.map(Path::to_path_buf).or_else(settings_path);
    match command {
        ConfigCommand::Path => match path {
            Some(path) => Ok(format!("{}\n", path.display())),
            None => bail!("could not determine settings path"),
        },
        ConfigCommand::Show => toml::to_string_pretty(settings).context("serialize settings"),
        ConfigCommand::Init { force } => {
            let Some(path) = path else {
                bail!("could not determine settings path");
            };
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            save_settings(&Settings::default(), &path)?;
            Ok(format!("wrote {}\n", path.display()))
        }
    }
}
