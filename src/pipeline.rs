//! The generation pass: load → merge → validate → metadata → generate → emit.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    code::{PropertySpec, TypeName},
    emitter::{Binding, BindingEmitter, KotlinEmitter, ResourceObject},
    error::Error,
    features::{
        AssetsFeature, ColorsFeature, FontsFeature, ImagesFeature, PluralsFeature,
        ResourceFeature, StringsFeature,
    },
    generators::{GeneratorContext, Platform},
    merge::merge,
    settings::Settings,
    traits::{PlatformResourceGenerator, ResourceLoader},
    tree::FileTree,
    types::{ResourceKind, ResourceMetadata, Tiers},
};

/// Where a pass writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirs {
    /// Native resource files of the platform.
    pub resources: PathBuf,
    /// Root of the generated accessor source.
    pub sources: PathBuf,
}

impl OutputDirs {
    pub fn new(resources: impl Into<PathBuf>, sources: impl Into<PathBuf>) -> Self {
        Self {
            resources: resources.into(),
            sources: sources.into(),
        }
    }
}

/// Runs every resource kind through one platform.
///
/// ```rust,no_run
/// use resgen::{DirTree, OutputDirs, Pipeline, Platform, Settings, Tiers};
///
/// let lower = DirTree::empty();
/// let own = DirTree::new("src/commonMain/resources/MR");
/// let upper = DirTree::empty();
/// let pipeline = Pipeline::new(
///     Settings::new().with_package_name("com.example"),
///     Tiers::new(&lower, &own, &upper),
/// );
/// let source = pipeline.run(
///     Platform::Android,
///     &OutputDirs::new("build/generated/res", "build/generated/src"),
/// )?;
/// println!("wrote {}", source.display());
/// # Ok::<(), resgen::Error>(())
/// ```
pub struct Pipeline<'a> {
    settings: Settings,
    sources: Tiers<&'a dyn FileTree>,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: Settings, sources: Tiers<&'a dyn FileTree>) -> Self {
        Self { settings, sources }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Generates native resources into `resources_dir` and returns the
    /// accessor description without writing source code.
    ///
    /// Every kind is attempted; failures of all kinds are reported together
    /// and no binding is returned if any kind failed.
    pub fn generate(&self, platform: Platform, resources_dir: &Path) -> Result<Binding, Error> {
        info!(%platform, "starting resource generation");
        let ctx = GeneratorContext::new(self.settings.clone(), resources_dir);
        let mut binding = Binding::new(
            platform,
            self.settings.package_name.clone(),
            self.settings.class_name.clone(),
        );
        let mut errors = Vec::new();

        let mut collect = |result: Result<Option<(ResourceObject, Vec<TypeName>)>, Error>| match result {
            Ok(Some((object, imports))) => {
                binding.imports.extend(imports);
                binding.objects.push(object);
            }
            Ok(None) => {}
            Err(err) => errors.push(err),
        };
        collect(self.run_feature(&StringsFeature, platform, &ctx));
        collect(self.run_feature(&PluralsFeature, platform, &ctx));
        collect(self.run_feature(&ImagesFeature, platform, &ctx));
        collect(self.run_feature(&FontsFeature, platform, &ctx));
        collect(self.run_feature(&ColorsFeature, platform, &ctx));
        collect(self.run_feature(&AssetsFeature, platform, &ctx));

        Error::from_many(errors)?;
        info!(%platform, objects = binding.objects.len(), "resource generation finished");
        Ok(binding)
    }

    /// Generates native resources and writes the accessor source with `emitter`.
    pub fn run_with(
        &self,
        platform: Platform,
        output: &OutputDirs,
        emitter: &dyn BindingEmitter,
    ) -> Result<PathBuf, Error> {
        let binding = self.generate(platform, &output.resources)?;
        emitter.emit(&binding, &output.sources)
    }

    /// [`run_with`](Self::run_with) using the Kotlin emitter.
    pub fn run(&self, platform: Platform, output: &OutputDirs) -> Result<PathBuf, Error> {
        self.run_with(platform, output, &KotlinEmitter)
    }

    fn run_feature<F: ResourceFeature>(
        &self,
        feature: &F,
        platform: Platform,
        ctx: &GeneratorContext,
    ) -> Result<Option<(ResourceObject, Vec<TypeName>)>, Error> {
        let kind = feature.kind();
        let loader = feature.loader(&self.settings);
        let raw = self.sources.try_map(|tier, tree| {
            debug!(%kind, ?tier, "loading tier");
            loader.load(*tree)
        })?;

        let merged = merge(kind, &raw);
        let metadata = feature.build_metadata(&merged)?;
        if metadata.is_empty() {
            debug!(%kind, "no resources, skipping");
            return Ok(None);
        }
        feature.validate(platform, &merged, &metadata)?;

        let generator = feature.generator(platform, ctx);
        generator.generate_resource_files(&metadata)?;
        debug!(%kind, %platform, keys = metadata.len(), "generated resource files");

        let mut imports = generator.imports();
        imports.push(ctx.resource_type(kind));
        Ok(Some((
            build_object(kind, ctx, &*generator, &metadata),
            imports,
        )))
    }
}

/// Collects the accessor properties of one kind.
fn build_object<M: ResourceMetadata>(
    kind: ResourceKind,
    ctx: &GeneratorContext,
    generator: &dyn PlatformResourceGenerator<M>,
    metadata: &[M],
) -> ResourceObject {
    let mut object = ResourceObject::new(kind);
    for property in generator.generate_before_properties(metadata) {
        object.add_before(property);
    }
    let type_name = ctx.resource_type(kind);
    object.resources = metadata
        .iter()
        .map(|item| {
            PropertySpec::new(item.key(), type_name.clone())
                .with_initializer(generator.generate_initializer(item))
        })
        .collect();
    object
}
