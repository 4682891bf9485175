//! Predicate and class IRIs used by the projectors.
//!
//! One module per namespace; every constant is a full IRI.

macro_rules! namespace {
    ($(#[$meta:meta])* $module:ident = $ns:literal { $($(#[$cmeta:meta])* $name:ident = $local:literal),* $(,)? }) => {
        $(#[$meta])*
        pub mod $module {
            pub const NS: &str = $ns;
            $($(#[$cmeta])* pub const $name: &str = concat!($ns, $local);)*
        }
    };
}

namespace!(rdf = "http://www.w3.org/1999/02/22-rdf-syntax-ns#" {
    TYPE = "type",
});

namespace!(rdfs = "http://www.w3.org/2000/01/rdf-schema#" {
    LABEL = "label",
});

namespace!(bibo = "http://purl.org/ontology/bibo/" {
    ABSTRACT = "abstract",
    CITES = "cites",
    DOI = "doi",
    PRESENTED_AT = "presentedAt",
});

namespace!(vcard = "http://www.w3.org/2006/vcard/ns#" {
    EMAIL = "email",
    FAMILY_NAME = "familyName",
    GIVEN_NAME = "givenName",
    HAS_EMAIL = "hasEmail",
    HAS_NAME = "hasName",
    WORK = "Work",
});

namespace!(vivo = "http://vivoweb.org/ontology/core#" {
    AUTHORSHIP = "Authorship",
    CONTRIBUTING_ROLE = "contributingRole",
    DATE_TIME = "dateTime",
    DATE_TIME_INTERVAL = "dateTimeInterval",
    DESCRIPTION = "description",
    END = "end",
    EQUIPMENT_FOR = "equipmentFor",
    GRANT = "Grant",
    HAS_FUNDING_VEHICLE = "hasFundingVehicle",
    HAS_RESEARCH_AREA = "hasResearchArea",
    HAS_SUBJECT_AREA = "hasSubjectArea",
    MEMBER_ROLE = "MemberRole",
    ORCID_ID = "orcidId",
    POSITION = "Position",
    RANK = "rank",
    RELATED_BY = "relatedBy",
    RELATES = "relates",
    ROLE = "Role",
    ROLE_CONTRIBUTES_TO = "roleContributesTo",
    START = "start",
});

namespace!(vitro = "http://vitro.mannlib.cornell.edu/ns/vitro/0.7#" {
    MOST_SPECIFIC_TYPE = "mostSpecificType",
});

namespace!(vitro_pub = "http://vitro.mannlib.cornell.edu/ns/vitro/public#" {
    DOWNLOAD_LOCATION = "downloadLocation",
    MAIN_IMAGE = "mainImage",
    THUMBNAIL_IMAGE = "thumbnailImage",
});

namespace!(
    /// OBO relation ontology terms VIVO uses for roles and contact info
    obo = "http://purl.obolibrary.org/obo/" {
        /// has contact info
        ARG_2000028 = "ARG_2000028",
        /// has participant
        BFO_0000055 = "BFO_0000055",
        /// inheres in
        RO_0000052 = "RO_0000052",
        /// bearer of
        RO_0000053 = "RO_0000053",
    }
);

namespace!(foaf = "http://xmlns.com/foaf/0.1/" {
    ORGANIZATION = "Organization",
    PERSON = "Person",
});

namespace!(prov = "http://www.w3.org/ns/prov#" {
    AGENT = "Agent",
    WAS_ATTRIBUTED_TO = "wasAttributedTo",
});

namespace!(dcat = "http://www.w3.org/ns/dcat#" {
    DISTRIBUTION = "Distribution",
});

namespace!(net_id = "http://vivo.mydomain.edu/ns#" {
    NETWORK_ID = "networkId",
});

namespace!(
    /// Deep Carbon Observatory schema
    dco = "http://info.deepcarbon.net/schema#" {
        ACCESS_URL = "accessURL",
        ASSOCIATED_DCO_COMMUNITY = "associatedDCOCommunity",
        ASSOCIATED_DCO_PORTAL_GROUP = "associatedDCOPortalGroup",
        BUILT_DURING_INITIATIVE = "builtDuringInitiative",
        CREATED_AT_TIME = "createdAtTime",
        DATA_TYPE_SUBJECT_AREA = "dataTypeSubjectArea",
        DCO_ID_FOR = "dcoIdFor",
        DOWNLOAD_URL = "downloadURL",
        FIELDWORK_LEADER = "fieldworkLeader",
        FOR_REPORTING_YEAR = "forReportingYear",
        HAS_DATA_TYPE = "hasDataType",
        HAS_DCO_ID = "hasDcoId",
        HAS_DISTRIBUTION = "hasDistribution",
        HAS_FILE = "hasFile",
        HAS_PROJECT_UPDATE = "hasProjectUpdate",
        HOME_COUNTRY = "homeCountry",
        IN_ORGANIZATION = "inOrganization",
        INSTRUMENT_CREATED_BY = "instrumentCreatedBy",
        IS_DATASET_OF = "isDatasetOf",
        PORTAL_GROUP = "PortalGroup",
        PROJECT_UPDATE = "ProjectUpdate",
        REPOSITORY_ONLINE_CATALOG = "repositoryOnlineCatalog",
        REPOSITORY_WEBSITE = "repositoryWebsite",
        RESEARCH_COMMUNITY = "ResearchCommunity",
        SOURCE_DATA_TYPE = "sourceDataType",
        SOURCE_STANDARD = "sourceStandard",
        SUBMITTED_BY = "submittedBy",
        TEAM = "Team",
        YEAR_OF_PUBLICATION = "yearOfPublication",
    }
);

namespace!(dco_sample = "http://info.deepcarbon.net/sample/schema#" {
    SAMPLE_CURATION_PRACTICE = "sampleCurationPractice",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_full_iris() {
        assert_eq!(rdfs::LABEL, "http://www.w3.org/2000/01/rdf-schema#label");
        assert_eq!(dco::HAS_DCO_ID, "http://info.deepcarbon.net/schema#hasDcoId");
        assert_eq!(obo::ARG_2000028, "http://purl.obolibrary.org/obo/ARG_2000028");
        assert!(vivo::RANK.starts_with(vivo::NS));
    }
}
