//! Cloud assembly output on disk.

#[cfg(test)]
mod tests {
    use std::fs;

    use acctform_constructs::{AssemblyManifest, DirectorySink, TemplateSink};
    use acctform_core::DeploymentEnv;
    use acctform_model::Template;

    use crate::{overrides_with_email, synth_stack};

    #[test]
    fn test_should_write_readable_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = synth_stack(
            "PersonalAwsManagementStack",
            overrides_with_email("a@b.com"),
            DeploymentEnv::default(),
        )
        .unwrap();

        DirectorySink::new(dir.path()).emit(&artifact).unwrap();

        let template_text =
            fs::read_to_string(dir.path().join("PersonalAwsManagementStack.template.json"))
                .unwrap();
        let template: Template = serde_json::from_str(&template_text).unwrap();
        assert_eq!(template, artifact.template);

        let manifest: AssemblyManifest =
            serde_json::from_str(&fs::read_to_string(dir.path().join("manifest.json")).unwrap())
                .unwrap();
        let entry = &manifest.artifacts["PersonalAwsManagementStack"];
        assert_eq!(
            entry.properties.template_file,
            "PersonalAwsManagementStack.template.json"
        );
        assert_eq!(entry.environment, artifact.environment);
    }

    #[test]
    fn test_should_replace_previous_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());

        let first = synth_stack("Acct", overrides_with_email("a@b.com"), DeploymentEnv::default())
            .unwrap();
        sink.emit(&first).unwrap();

        let mut overrides = overrides_with_email("c@d.com");
        overrides.resource_prefix = Some("lab".to_owned());
        let second = synth_stack("Acct", overrides, DeploymentEnv::default()).unwrap();
        sink.emit(&second).unwrap();

        let text = fs::read_to_string(dir.path().join("Acct.template.json")).unwrap();
        assert!(text.contains("lab-billing-alerts"));
        assert!(!text.contains("a@b.com"));
    }
}
