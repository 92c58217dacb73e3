//! Configuration flowing into synthesized resources.

#[cfg(test)]
mod tests {
    use acctform_core::{
        AccountConfigOverrides, AcctFormError, Budgets, ConfigError, DeploymentEnv,
    };

    use crate::{overrides_with_email, resources_of_type, synth_stack, synth_template_json};

    #[test]
    fn test_should_refuse_placeholder_email() {
        let err = synth_template_json(AccountConfigOverrides::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AcctFormError>(),
            Some(AcctFormError::Config(ConfigError::MissingAlertEmail(_)))
        ));
    }

    #[test]
    fn test_should_refuse_address_without_at_sign() {
        let err = synth_template_json(overrides_with_email("not-an-address")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AcctFormError>(),
            Some(AcctFormError::Config(ConfigError::InvalidAlertEmail(_)))
        ));
    }

    #[test]
    fn test_should_refuse_malformed_account_id() {
        let mut overrides = overrides_with_email("a@b.com");
        overrides.account_id = Some("12345".to_owned());
        let err = synth_template_json(overrides).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AcctFormError>(),
            Some(AcctFormError::Config(ConfigError::InvalidAccountId(_)))
        ));
    }

    #[test]
    fn test_should_apply_json_overrides_to_resources() {
        let overrides = AccountConfigOverrides::from_json_str(
            r#"{
                "alertEmail": "ops@example.org",
                "awsAccountId": "677803207672",
                "billingAlerts": {"lowThreshold": 5, "mediumThreshold": 15, "highThreshold": 30},
                "budgets": {"monthlyLimit": 20, "quarterlyLimit": 60},
                "resourcePrefix": "lab"
            }"#,
        )
        .unwrap();
        let template = synth_template_json(overrides).unwrap();

        let (_, topic) = resources_of_type(&template, "AWS::SNS::Topic")[0];
        assert_eq!(topic["Properties"]["TopicName"], "lab-billing-alerts");

        let mut thresholds: Vec<f64> = resources_of_type(&template, "AWS::CloudWatch::Alarm")
            .into_iter()
            .map(|(_, a)| a["Properties"]["Threshold"].as_f64().unwrap())
            .collect();
        thresholds.sort_by(f64::total_cmp);
        assert_eq!(thresholds, vec![5.0, 15.0, 30.0]);

        let budgets = resources_of_type(&template, "AWS::Budgets::Budget");
        let monthly = budgets
            .iter()
            .find(|(_, b)| b["Properties"]["Budget"]["BudgetName"] == "lab-monthly-budget")
            .unwrap()
            .1;
        assert_eq!(
            monthly["Properties"]["Budget"]["BudgetLimit"]["Amount"].as_f64(),
            Some(20.0)
        );
        assert_eq!(monthly["Properties"]["Budget"]["BudgetLimit"]["Unit"], "USD");

        let (_, subscription) = resources_of_type(&template, "AWS::SNS::Subscription")[0];
        assert_eq!(subscription["Properties"]["Endpoint"], "ops@example.org");
    }

    #[test]
    fn test_should_reject_partial_threshold_group() {
        let result = AccountConfigOverrides::from_json_str(
            r#"{"billingAlerts": {"lowThreshold": 5}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_should_refuse_misordered_thresholds() {
        let overrides = AccountConfigOverrides::from_json_str(
            r#"{
                "alertEmail": "a@b.com",
                "billingAlerts": {"lowThreshold": 25, "mediumThreshold": 25, "highThreshold": 50}
            }"#,
        )
        .unwrap();
        let err = synth_template_json(overrides).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AcctFormError>(),
            Some(AcctFormError::Config(
                ConfigError::LowThresholdNotBelowMedium { .. }
            ))
        ));
    }

    #[test]
    fn test_should_refuse_non_finite_budget() {
        let mut overrides = overrides_with_email("a@b.com");
        overrides.budgets = Some(Budgets {
            monthly_limit: f64::NAN,
            quarterly_limit: 150.0,
        });
        let err = synth_template_json(overrides).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AcctFormError>(),
            Some(AcctFormError::Config(ConfigError::NonFiniteValue {
                field: "monthlyLimit",
                ..
            }))
        ));
    }

    #[test]
    fn test_should_stamp_deployment_environment() {
        let env = DeploymentEnv {
            account: Some("677803207672".to_owned()),
            region: Some("eu-west-1".to_owned()),
        };
        let artifact =
            synth_stack("PersonalAwsManagementStack", overrides_with_email("a@b.com"), env)
                .unwrap();
        assert_eq!(artifact.environment, "aws://677803207672/eu-west-1");

        let artifact = synth_stack(
            "PersonalAwsManagementStack",
            overrides_with_email("a@b.com"),
            DeploymentEnv::default(),
        )
        .unwrap();
        assert_eq!(artifact.environment, "aws://unknown-account/unknown-region");
    }
}
