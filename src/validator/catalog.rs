//! Reference catalog of CloudWatch namespaces the exporter has metric files for.
//!
//! Entries are stored without the `AWS/` prefix, in the canonical casing AWS
//! publishes. Lookups compare against that casing exactly. No two entries may
//! be equal when compared case-insensitively.

pub const NAMESPACE_PREFIX: &str = "AWS/";

pub const NAMESPACE_CATALOG: &[&str] = &[
    "AmazonMQ",
    "ApiGateway",
    "AppRunner",
    "AppStream",
    "AppSync",
    "ApplicationELB",
    "Athena",
    "AutoScaling",
    "Backup",
    "Billing",
    "CertificateManager",
    "CloudFront",
    "CloudHSM",
    "CloudSearch",
    "CodeBuild",
    "Cognito",
    "Connect",
    "DMS",
    "DX",
    "DocDB",
    "DynamoDB",
    "EBS",
    "EC2",
    "EC2Spot",
    "ECR",
    "ECS",
    "EFS",
    "ELB",
    "EMR",
    "ES",
    "ElastiCache",
    "ElasticBeanstalk",
    "ElasticInference",
    "ElasticTranscoder",
    "Events",
    "FSx",
    "Firehose",
    "GameLift",
    "Glue",
    "Inspector",
    "IoT",
    "KMS",
    "Kafka",
    "Kinesis",
    "KinesisAnalytics",
    "KinesisVideo",
    "Lambda",
    "Lex",
    "Logs",
    "MediaTailor",
    "NATGateway",
    "Neptune",
    "NetworkELB",
    "OpsWorks",
    "Polly",
    "RDS",
    "Redshift",
    "Route53",
    "S3",
    "SES",
    "SNS",
    "SQS",
    "SWF",
    "SageMaker",
    "States",
    "StorageGateway",
    "Textract",
    "Transfer",
    "TransitGateway",
    "Translate",
    "TrustedAdvisor",
    "VPN",
    "WAFV2",
    "WorkSpaces",
];

/// Look up a bare service name (no prefix). Only the canonical casing matches.
pub fn canonical_service<'a>(catalog: &[&'a str], service: &str) -> Option<&'a str> {
    catalog.iter().copied().find(|entry| *entry == service)
}

/// Strip a leading literal `AWS/` prefix.
pub fn strip_namespace_prefix(token: &str) -> &str {
    token.strip_prefix(NAMESPACE_PREFIX).unwrap_or(token)
}
