mod policy_test;
