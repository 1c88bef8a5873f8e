//! Employee records and their mappers
//!
//! Two projections come back from the API: the full employee record from the
//! `employees` / `employeesWithSSN` collections, and the reduced roster record
//! from `employeesMinimal`. Both are built from one raw JSON object by a pure
//! `from_record` function and are never mutated afterwards.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::identifiers::EmployeeId;
use crate::error::Result;
use crate::utils::{
    flag, lookup, nullable_str, optional_date, optional_f64, optional_str, required_str,
};

/// Days per year used for fractional ages
const DAYS_PER_YEAR: f64 = 365.25;

/// Full-time-equivalent key as the vendor spells it
const FTE_KEY: &str = "employeeCategoryFullTimeEquivalient";
const FTE_KEY_CORRECTED: &str = "employeeCategoryFullTimeEquivalent";

/// Reference to an employee's assigned manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerRef {
    /// Manager's display name
    pub name: String,
    /// Manager's employee id
    pub id: String,
}

/// How an employee is paid, derived from pay type and the rate fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compensation {
    /// Paid by the hour
    Hourly(f64),
    /// Paid an annual salary
    Salaried(f64),
    /// No usable rate for the pay type
    Unknown,
}

/// Full employee record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Record id
    pub id: EmployeeId,
    /// Employee number shown in payroll
    pub employee_number: String,
    /// Time clock id
    pub time_clock_id: String,

    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Middle name
    pub middle_name: Option<String>,
    /// Gender
    pub gender: Option<String>,
    /// Marital status
    pub marital_status: String,
    /// Date of birth
    pub birth_date: Option<NaiveDate>,

    /// Street address
    pub address1: String,
    /// Second address line
    pub address2: Option<String>,
    /// City
    pub city: String,
    /// State
    pub state: String,
    /// ZIP code
    pub zip_code: String,

    /// Email address
    pub email: String,
    /// Home phone number
    pub phone_number: String,

    /// Hire date
    pub hire_date: Option<NaiveDate>,
    /// Employment status (e.g. "Active", "Terminated")
    pub employment_status: String,
    /// Employee category code (e.g. "FT")
    pub employee_category_code: String,
    /// Full-time-equivalent category (e.g. "Full Time")
    pub employee_category_fulltime_equivalent: String,
    /// Employment type (e.g. "Full Time")
    pub employment_type: String,
    /// Pay type (e.g. "Auto Salary", "Hourly")
    pub pay_type: String,
    /// Hourly rate, for hourly employees
    pub hourly_rate: Option<f64>,
    /// Annual salary, for salaried employees
    pub annual_salary: Option<f64>,
    /// Assigned manager
    pub manager: Option<ManagerRef>,

    /// Job id
    pub job_id: String,
    /// Job title
    pub job_title: String,
    /// Work location
    pub work_location: String,
    /// Legal entity code (e.g. "2502007-1")
    pub legal_code: String,

    /// Social security number, only from the `employeesWithSSN` collection
    pub ssn: Option<String>,
}

impl Employee {
    /// Map a raw `employees` record.
    ///
    /// # Errors
    /// `MissingField` naming the key when a required field is absent,
    /// `InvalidField` when a rate is not numeric.
    ///
    /// Only gender, the two rates, the manager reference, the SSN and the
    /// dates may be absent. `middleName` and `nameAddress.address2` must be
    /// present but may be `null`. An `assignedManager` object, when present,
    /// must carry both `id` and `employeeName`.
    pub fn from_record(record: &Value) -> Result<Self> {
        Ok(Self {
            id: EmployeeId::new(required_str(record, "id")?),
            employee_number: required_str(record, "employeeNumber")?,
            time_clock_id: required_str(record, "timeClockId")?,

            first_name: required_str(record, "firstName")?,
            last_name: required_str(record, "lastName")?,
            middle_name: nullable_str(record, "middleName")?,
            gender: optional_str(record, "gender"),
            marital_status: required_str(record, "maritalStatus")?,
            birth_date: optional_date(record, "birthDate")
                .or_else(|| optional_date(record, "birthdate")),

            address1: required_str(record, "nameAddress.address1")?,
            address2: nullable_str(record, "nameAddress.address2")?,
            city: required_str(record, "nameAddress.city")?,
            state: required_str(record, "nameAddress.state")?,
            zip_code: required_str(record, "nameAddress.zipCode")?,

            email: required_str(record, "emailAddress")?,
            phone_number: required_str(record, "personal.homePhone")?,

            hire_date: optional_date(record, "hireDate"),
            employment_status: required_str(record, "employmentStatus")?,
            employee_category_code: required_str(record, "employeeCategoryCode")?,
            employee_category_fulltime_equivalent: required_str(record, FTE_KEY)
                .or_else(|err| optional_str(record, FTE_KEY_CORRECTED).ok_or(err))?,
            employment_type: required_str(record, "employmentType")?,
            pay_type: required_str(record, "payType")?,
            hourly_rate: optional_f64(record, "hourlyRate")?,
            annual_salary: optional_f64(record, "annualSalary")?,
            manager: match lookup(record, "assignedManager") {
                None => None,
                Some(_) => Some(ManagerRef {
                    name: required_str(record, "assignedManager.employeeName")?,
                    id: required_str(record, "assignedManager.id")?,
                }),
            },

            job_id: required_str(record, "jobId")?,
            job_title: required_str(record, "jobTitle")?,
            work_location: required_str(record, "workLocation")?,
            legal_code: required_str(record, "legalCode")?,

            ssn: optional_str(record, "ssn"),
        })
    }

    /// "First Middle Last", skipping an empty middle name
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref().map(str::trim) {
            Some(middle) if !middle.is_empty() => {
                format!("{} {middle} {}", self.first_name, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// True for the hourly pay type
    #[must_use]
    pub fn is_hourly(&self) -> bool {
        self.pay_type.eq_ignore_ascii_case("hourly")
    }

    /// Rate matching the pay type. Hourly and salaried rates are mutually
    /// exclusive; the field for the other pay type is ignored.
    #[must_use]
    pub fn compensation(&self) -> Compensation {
        let rate = if self.is_hourly() {
            self.hourly_rate.map(Compensation::Hourly)
        } else {
            self.annual_salary.map(Compensation::Salaried)
        };
        rate.unwrap_or(Compensation::Unknown)
    }

    /// Age in fractional years on `on`, if the birth date is known
    #[must_use]
    pub fn age_on(&self, on: NaiveDate) -> Option<f64> {
        self.birth_date
            .map(|birth| (on - birth).num_days() as f64 / DAYS_PER_YEAR)
    }

    /// Age in fractional years today
    #[must_use]
    pub fn age(&self) -> Option<f64> {
        self.age_on(Local::now().date_naive())
    }

    /// Whole days since hire on `on`, if the hire date is known
    #[must_use]
    pub fn tenure_on(&self, on: NaiveDate) -> Option<i64> {
        self.hire_date.map(|hire| (on - hire).num_days())
    }

    /// Whole days since hire as of today
    #[must_use]
    pub fn tenure(&self) -> Option<i64> {
        self.tenure_on(Local::now().date_naive())
    }

    /// True when the employee is at least `years` old on `on`.
    /// An unknown birth date never satisfies the threshold.
    #[must_use]
    pub fn is_at_least_age(&self, years: f64, on: NaiveDate) -> bool {
        self.age_on(on).is_some_and(|age| age >= years)
    }
}

/// Reduced roster record from `employeesMinimal`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalEmployee {
    /// Record id
    pub id: EmployeeId,
    /// Employee number
    pub employee_number: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Middle name
    pub middle_name: Option<String>,
    /// Work location
    pub work_location: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Employment status
    pub employment_status: String,
    /// Employee is a manager
    pub is_manager: bool,
    /// Employee is a supervisor
    pub is_supervisor: bool,
    /// Job code
    pub job_code: Option<String>,
    /// Job title
    pub job_title: Option<String>,
}

impl MinimalEmployee {
    /// Map a raw `employeesMinimal` record.
    ///
    /// # Errors
    /// `MissingField` naming the key when a required field is absent.
    pub fn from_record(record: &Value) -> Result<Self> {
        Ok(Self {
            id: EmployeeId::new(required_str(record, "id")?),
            employee_number: required_str(record, "employeeNumber")?,
            first_name: required_str(record, "firstName")?,
            last_name: required_str(record, "lastName")?,
            middle_name: optional_str(record, "middleName"),
            work_location: optional_str(record, "workLocation"),
            email: optional_str(record, "emailAddress"),
            employment_status: required_str(record, "employmentStatus")?,
            is_manager: flag(record, "isManager")?,
            is_supervisor: flag(record, "isSupervisor")?,
            job_code: optional_str(record, "jobCode"),
            job_title: optional_str(record, "jobTitle"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsperityError;
    use serde_json::json;

    fn raw_employee() -> Value {
        json!({
            "id": "A1",
            "employeeNumber": "0012",
            "timeClockId": "clock-0012",
            "firstName": "Jo",
            "lastName": "Doe",
            "middleName": "",
            "gender": "F",
            "maritalStatus": "Single",
            "birthDate": "1990-05-01T00:00:00",
            "nameAddress": {
                "address1": "123 Main St",
                "address2": null,
                "city": "Anytown",
                "state": "NY",
                "zipCode": "12345"
            },
            "personal": {"homePhone": "888-001-1234"},
            "emailAddress": "jo@example.com",
            "hireDate": "2020-01-01T00:00:00",
            "employmentStatus": "Active",
            "employeeCategoryCode": "FT",
            "employeeCategoryFullTimeEquivalient": "Full Time",
            "employmentType": "Full Time",
            "payType": "Hourly",
            "hourlyRate": 17.5,
            "annualSalary": 0,
            "assignedManager": {"employeeName": "Scrooge McDuck", "id": "0017"},
            "jobId": "job-001",
            "jobTitle": "Engineer",
            "workLocation": "NY",
            "legalCode": "207001-1"
        })
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_map_full_record() {
        let employee = Employee::from_record(&raw_employee()).unwrap();
        assert_eq!(employee.id.as_str(), "A1");
        assert_eq!(employee.city, "Anytown");
        assert_eq!(employee.address2, None);
        assert_eq!(employee.phone_number, "888-001-1234");
        assert_eq!(employee.employee_category_fulltime_equivalent, "Full Time");
        assert_eq!(employee.time_clock_id, "clock-0012");
        assert_eq!(employee.birth_date, Some(date(1990, 5, 1)));
        assert_eq!(
            employee.manager,
            Some(ManagerRef {
                name: "Scrooge McDuck".to_string(),
                id: "0017".to_string()
            })
        );
        assert_eq!(employee.ssn, None);
        assert_eq!(employee.full_name(), "Jo Doe");
    }

    #[test]
    fn test_tenure_and_age_on_reference_date() {
        let employee = Employee::from_record(&raw_employee()).unwrap();
        let reference = date(2025, 1, 1);

        assert_eq!(employee.tenure_on(reference), Some(1827));

        let age = employee.age_on(reference).unwrap();
        assert!((age - 34.67).abs() < 0.01, "age was {age}");

        assert!(employee.is_at_least_age(34.0, reference));
        assert!(!employee.is_at_least_age(35.0, reference));
    }

    #[test]
    fn test_missing_employment_status_fails() {
        let mut record = raw_employee();
        record.as_object_mut().unwrap().remove("employmentStatus");

        let err = Employee::from_record(&record).unwrap_err();
        assert!(matches!(err, InsperityError::MissingField(ref f) if f == "employmentStatus"));
    }

    #[test]
    fn test_missing_nested_field_names_path() {
        let mut record = raw_employee();
        record["nameAddress"].as_object_mut().unwrap().remove("city");

        let err = Employee::from_record(&record).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: nameAddress.city");
    }

    #[test]
    fn test_missing_time_clock_id_fails() {
        let mut record = raw_employee();
        record.as_object_mut().unwrap().remove("timeClockId");

        let err = Employee::from_record(&record).unwrap_err();
        assert!(matches!(err, InsperityError::MissingField(ref f) if f == "timeClockId"));
    }

    #[test]
    fn test_every_non_optional_key_is_required() {
        let top_level = [
            "employeeNumber",
            "firstName",
            "lastName",
            "middleName",
            "maritalStatus",
            "emailAddress",
            "employeeCategoryCode",
            "employeeCategoryFullTimeEquivalient",
            "employmentType",
            "payType",
            "jobId",
            "jobTitle",
            "workLocation",
            "legalCode",
        ];
        for key in top_level {
            let mut record = raw_employee();
            record.as_object_mut().unwrap().remove(key);
            assert!(
                matches!(Employee::from_record(&record), Err(InsperityError::MissingField(ref f)) if f == key),
                "{key} should be required"
            );
        }

        let mut record = raw_employee();
        record["personal"].as_object_mut().unwrap().remove("homePhone");
        assert!(matches!(
            Employee::from_record(&record),
            Err(InsperityError::MissingField(ref f)) if f == "personal.homePhone"
        ));

        let mut record = raw_employee();
        record["nameAddress"].as_object_mut().unwrap().remove("address2");
        assert!(matches!(
            Employee::from_record(&record),
            Err(InsperityError::MissingField(ref f)) if f == "nameAddress.address2"
        ));
    }

    #[test]
    fn test_null_middle_name_and_address2_are_accepted() {
        let mut record = raw_employee();
        record["middleName"] = Value::Null;

        let employee = Employee::from_record(&record).unwrap();
        assert_eq!(employee.middle_name, None);
        assert_eq!(employee.address2, None);
        assert_eq!(employee.full_name(), "Jo Doe");
    }

    #[test]
    fn test_corrected_fte_spelling_is_accepted() {
        let mut record = raw_employee();
        let obj = record.as_object_mut().unwrap();
        obj.remove("employeeCategoryFullTimeEquivalient");
        obj.insert(
            "employeeCategoryFullTimeEquivalent".to_string(),
            json!("Part Time"),
        );

        let employee = Employee::from_record(&record).unwrap();
        assert_eq!(employee.employee_category_fulltime_equivalent, "Part Time");
    }

    #[test]
    fn test_manager_without_id_fails() {
        let mut record = raw_employee();
        record["assignedManager"] = json!({"employeeName": "Scrooge McDuck"});

        let err = Employee::from_record(&record).unwrap_err();
        assert!(matches!(err, InsperityError::MissingField(ref f) if f == "assignedManager.id"));
    }

    #[test]
    fn test_null_manager_is_absent() {
        let mut record = raw_employee();
        record["assignedManager"] = Value::Null;

        let employee = Employee::from_record(&record).unwrap();
        assert_eq!(employee.manager, None);
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let mut record = raw_employee();
        let obj = record.as_object_mut().unwrap();
        for key in ["hourlyRate", "annualSalary", "gender", "assignedManager", "birthDate"] {
            obj.remove(key);
        }

        let employee = Employee::from_record(&record).unwrap();
        assert_eq!(employee.hourly_rate, None);
        assert_eq!(employee.annual_salary, None);
        assert_eq!(employee.gender, None);
        assert_eq!(employee.manager, None);
        assert_eq!(employee.birth_date, None);
        assert_eq!(employee.age_on(date(2025, 1, 1)), None);
        assert!(!employee.is_at_least_age(18.0, date(2025, 1, 1)));
    }

    #[test]
    fn test_lowercase_birthdate_key() {
        let mut record = raw_employee();
        let obj = record.as_object_mut().unwrap();
        obj.remove("birthDate");
        obj.insert("birthdate".to_string(), json!("1980-01-01T00:00:00"));

        let employee = Employee::from_record(&record).unwrap();
        assert_eq!(employee.birth_date, Some(date(1980, 1, 1)));
    }

    #[test]
    fn test_malformed_hire_date_is_absent() {
        let mut record = raw_employee();
        record["hireDate"] = json!("TBD");

        let employee = Employee::from_record(&record).unwrap();
        assert_eq!(employee.hire_date, None);
        assert_eq!(employee.tenure_on(date(2025, 1, 1)), None);
    }

    #[test]
    fn test_ssn_and_string_rates() {
        let mut record = raw_employee();
        record["ssn"] = json!("123-45-6789");
        record["payType"] = json!("Auto Salary");
        record["annualSalary"] = json!("65000.00");

        let employee = Employee::from_record(&record).unwrap();
        assert_eq!(employee.ssn.as_deref(), Some("123-45-6789"));
        assert_eq!(employee.compensation(), Compensation::Salaried(65000.0));
    }

    #[test]
    fn test_compensation_by_pay_type() {
        let employee = Employee::from_record(&raw_employee()).unwrap();
        assert!(employee.is_hourly());
        assert_eq!(employee.compensation(), Compensation::Hourly(17.5));

        let mut record = raw_employee();
        record.as_object_mut().unwrap().remove("hourlyRate");
        let employee = Employee::from_record(&record).unwrap();
        assert_eq!(employee.compensation(), Compensation::Unknown);
    }

    #[test]
    fn test_non_numeric_rate_is_invalid() {
        let mut record = raw_employee();
        record["hourlyRate"] = json!("n/a");

        assert!(matches!(
            Employee::from_record(&record),
            Err(InsperityError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_full_name_with_middle() {
        let mut record = raw_employee();
        record["middleName"] = json!("Q");
        let employee = Employee::from_record(&record).unwrap();
        assert_eq!(employee.full_name(), "Jo Q Doe");
    }

    #[test]
    fn test_map_minimal_record() {
        let record = json!({
            "id": 407924,
            "employeeNumber": "0099",
            "firstName": "Sam",
            "lastName": "Neace",
            "emailAddress": "sam@example.com",
            "employmentStatus": "Active",
            "isSupervisor": true,
            "jobCode": "MGR",
            "jobTitle": "Shift Lead"
        });

        let employee = MinimalEmployee::from_record(&record).unwrap();
        assert_eq!(employee.id.as_str(), "407924");
        assert!(employee.is_supervisor);
        assert!(!employee.is_manager);
        assert_eq!(employee.work_location, None);
        assert_eq!(employee.job_code.as_deref(), Some("MGR"));
    }

    #[test]
    fn test_minimal_missing_status_fails() {
        let record = json!({
            "id": "1", "employeeNumber": "1", "firstName": "A", "lastName": "B"
        });
        assert!(matches!(
            MinimalEmployee::from_record(&record),
            Err(InsperityError::MissingField(ref f)) if f == "employmentStatus"
        ));
    }
}
