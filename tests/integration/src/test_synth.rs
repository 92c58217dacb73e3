//! Full-stack synthesis tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{overrides_with_email, resources_of_type, synth_template_json};

    #[test]
    fn test_should_emit_every_resource_group() {
        let template = synth_template_json(overrides_with_email("a@b.com")).unwrap();

        assert_eq!(template["AWSTemplateFormatVersion"], "2010-09-09");
        assert_eq!(
            template["Description"],
            "Personal AWS account management with IAM roles and billing controls"
        );
        assert_eq!(resources_of_type(&template, "AWS::IAM::Role").len(), 4);
        assert_eq!(resources_of_type(&template, "AWS::IAM::ManagedPolicy").len(), 4);
        assert_eq!(resources_of_type(&template, "AWS::SNS::Topic").len(), 1);
        assert_eq!(resources_of_type(&template, "AWS::SNS::Subscription").len(), 1);
        assert_eq!(resources_of_type(&template, "AWS::CloudWatch::Alarm").len(), 3);
        assert_eq!(resources_of_type(&template, "AWS::Budgets::Budget").len(), 2);
        assert_eq!(template["Resources"].as_object().unwrap().len(), 15);
    }

    #[test]
    fn test_should_output_assumable_role_arns() {
        let template = synth_template_json(overrides_with_email("a@b.com")).unwrap();
        let outputs = template["Outputs"].as_object().unwrap();
        assert_eq!(outputs.len(), 3);

        for (output, role_name, description) in [
            (
                "DevRoleArn",
                "PersonalDeveloperRole",
                "ARN of the development role",
            ),
            (
                "ReadOnlyRoleArn",
                "PersonalReadOnlyRole",
                "ARN of the read-only role",
            ),
            (
                "EmergencyRoleArn",
                "PersonalEmergencyRole",
                "ARN of the emergency access role",
            ),
        ] {
            let value = &outputs[output]["Value"]["Fn::GetAtt"];
            let logical_id = value[0].as_str().unwrap();
            assert_eq!(value[1], "Arn");
            assert_eq!(
                template["Resources"][logical_id]["Properties"]["RoleName"],
                role_name
            );
            assert_eq!(outputs[output]["Description"], description);
        }
    }

    #[test]
    fn test_should_wire_alarms_to_topic() {
        let template = synth_template_json(overrides_with_email("a@b.com")).unwrap();
        let (topic_id, topic) = resources_of_type(&template, "AWS::SNS::Topic")[0];
        assert_eq!(topic["Properties"]["TopicName"], "personal-billing-alerts");

        for (_, alarm) in resources_of_type(&template, "AWS::CloudWatch::Alarm") {
            assert_eq!(alarm["Properties"]["AlarmActions"], json!([{"Ref": topic_id}]));
            assert_eq!(alarm["Properties"]["TreatMissingData"], "notBreaching");
            assert_eq!(alarm["Properties"]["Period"], 21600);
        }

        let (_, subscription) = resources_of_type(&template, "AWS::SNS::Subscription")[0];
        assert_eq!(
            subscription["Properties"],
            json!({
                "Endpoint": "a@b.com",
                "Protocol": "email",
                "TopicArn": {"Ref": topic_id}
            })
        );
    }

    #[test]
    fn test_should_name_alarms_after_thresholds() {
        let template = synth_template_json(overrides_with_email("a@b.com")).unwrap();
        let mut names: Vec<_> = resources_of_type(&template, "AWS::CloudWatch::Alarm")
            .into_iter()
            .map(|(_, a)| a["Properties"]["AlarmName"].as_str().unwrap().to_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "billing-alarm-10-usd",
                "billing-alarm-25-usd",
                "billing-alarm-50-usd-critical",
            ]
        );
    }

    #[test]
    fn test_should_write_single_action_as_scalar() {
        let template = synth_template_json(overrides_with_email("a@b.com")).unwrap();
        let role = resources_of_type(&template, "AWS::IAM::Role")
            .into_iter()
            .find(|(_, r)| r["Properties"]["RoleName"] == "PersonalLambdaExecutionRole")
            .map(|(_, r)| r)
            .unwrap();
        let trust = &role["Properties"]["AssumeRolePolicyDocument"];
        assert_eq!(trust["Version"], "2012-10-17");
        assert_eq!(trust["Statement"][0]["Action"], "sts:AssumeRole");
        assert_eq!(
            trust["Statement"][0]["Principal"],
            json!({"Service": "lambda.amazonaws.com"})
        );
    }

    #[test]
    fn test_should_be_deterministic() {
        let a = synth_template_json(overrides_with_email("a@b.com")).unwrap();
        let b = synth_template_json(overrides_with_email("a@b.com")).unwrap();
        assert_eq!(a, b);
    }
}
